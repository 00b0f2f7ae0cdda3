use chrono::NaiveDate;
use serde::Serialize;

/// One trading day for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub timestamp: NaiveDate,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            close,
            volume,
        }
    }
}

/// Oversold and overbought RSI lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for SwingThresholds {
    fn default() -> Self {
        Self {
            oversold: 20.0,
            overbought: 70.0,
        }
    }
}

/// Pending-entry state of the swing scanner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwingState {
    Idle,
    Armed { index: usize, price: f64 },
}

/// A completed oversold to overbought excursion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swing {
    pub entry_index: usize,
    pub entry_price: f64,
    pub exit_index: usize,
    pub exit_price: f64,
    pub gain_pct: f64,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary {
    pub swings: Vec<Swing>,
    pub total: usize,
    pub successes: usize,
    pub mean_volume: f64,
}

impl ScanSummary {
    pub fn empty() -> Self {
        Self {
            swings: Vec::new(),
            total: 0,
            successes: 0,
            mean_volume: 0.0,
        }
    }

    /// Percentage of swings that met the gain threshold; 0.0 without swings.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successes as f64 / self.total as f64 * 100.0
        }
    }
}

/// Per-ticker screening outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerResult {
    pub ticker: String,
    pub total_swings: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub mean_volume: f64,
}

impl TickerResult {
    pub fn from_summary(ticker: impl Into<String>, summary: &ScanSummary) -> Self {
        Self {
            ticker: ticker.into(),
            total_swings: summary.total,
            successes: summary.successes,
            success_rate: summary.success_rate(),
            mean_volume: summary.mean_volume,
        }
    }
}
