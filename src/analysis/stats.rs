use std::cmp::Ordering;

use crate::data::TickerResult;

/// Minimums a ticker must reach to be reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenCriteria {
    pub min_swings: usize,
    pub min_gain_pct: f64,
    pub min_success_rate: f64,
    pub min_volume: f64,
}

impl Default for ScreenCriteria {
    fn default() -> Self {
        Self {
            min_swings: 10,
            min_gain_pct: 10.0,
            min_success_rate: 50.0,
            min_volume: 100_000.0,
        }
    }
}

impl ScreenCriteria {
    pub fn meets_volume(&self, mean_volume: f64) -> bool {
        mean_volume >= self.min_volume
    }

    pub fn accepts(&self, result: &TickerResult) -> bool {
        result.total_swings >= self.min_swings && result.success_rate >= self.min_success_rate
    }
}

/// Order by success rate, then swing count, then symbol.
pub fn rank_results(mut results: Vec<TickerResult>) -> Vec<TickerResult> {
    results.sort_by(|a, b| {
        b.success_rate
            .partial_cmp(&a.success_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.total_swings.cmp(&a.total_swings))
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    results
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
