use statrs::statistics::Statistics;
use thiserror::Error;

use crate::data::{Bar, ScanSummary, Swing, SwingState, SwingThresholds};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("price series has {bars} bars but RSI series has {rsi} values")]
    MisalignedSeries { bars: usize, rsi: usize },
}

/// Detect oversold to overbought swings with the default 20/70 lines.
pub fn scan_swings(
    bars: &[Bar],
    rsi: &[Option<f64>],
    min_gain_pct: f64,
) -> Result<ScanSummary, ScanError> {
    scan_swings_with(bars, rsi, min_gain_pct, SwingThresholds::default())
}

pub fn scan_swings_with(
    bars: &[Bar],
    rsi: &[Option<f64>],
    min_gain_pct: f64,
    thresholds: SwingThresholds,
) -> Result<ScanSummary, ScanError> {
    if bars.len() != rsi.len() {
        return Err(ScanError::MisalignedSeries {
            bars: bars.len(),
            rsi: rsi.len(),
        });
    }
    if bars.is_empty() {
        return Ok(ScanSummary::empty());
    }

    let mut scanner = SwingScanner::new(thresholds, min_gain_pct);
    for idx in 1..bars.len() {
        scanner.step(idx, rsi[idx - 1], rsi[idx], bars[idx].close);
    }

    let mean_volume = bars.iter().map(|bar| bar.volume).mean();
    Ok(scanner.finish(mean_volume))
}

/// Single-pass state machine over an aligned (price, RSI) series.
#[derive(Debug, Clone)]
pub struct SwingScanner {
    thresholds: SwingThresholds,
    min_gain_pct: f64,
    state: SwingState,
    swings: Vec<Swing>,
    successes: usize,
}

impl SwingScanner {
    pub fn new(thresholds: SwingThresholds, min_gain_pct: f64) -> Self {
        Self {
            thresholds,
            min_gain_pct,
            state: SwingState::Idle,
            swings: Vec::new(),
            successes: 0,
        }
    }

    pub fn state(&self) -> SwingState {
        self.state
    }

    /// Advance by one bar. Undefined RSI on either side never crosses.
    pub fn step(&mut self, index: usize, prev: Option<f64>, curr: Option<f64>, close: f64) {
        let (Some(prev), Some(curr)) = (prev, curr) else {
            return;
        };

        if prev > self.thresholds.oversold && curr <= self.thresholds.oversold {
            // A newer oversold point replaces any unresolved entry.
            self.state = SwingState::Armed {
                index,
                price: close,
            };
        }

        if let SwingState::Armed {
            index: entry_index,
            price: entry_price,
        } = self.state
        {
            if prev < self.thresholds.overbought && curr >= self.thresholds.overbought {
                let gain_pct = (close - entry_price) / entry_price * 100.0;
                let success = gain_pct >= self.min_gain_pct;
                if success {
                    self.successes += 1;
                }
                self.swings.push(Swing {
                    entry_index,
                    entry_price,
                    exit_index: index,
                    exit_price: close,
                    gain_pct,
                    success,
                });
                self.state = SwingState::Idle;
            }
        }
    }

    /// Close the scan; a still-armed entry is dropped.
    pub fn finish(self, mean_volume: f64) -> ScanSummary {
        ScanSummary {
            total: self.swings.len(),
            successes: self.successes,
            swings: self.swings,
            mean_volume,
        }
    }
}
