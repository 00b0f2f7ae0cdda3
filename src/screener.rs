use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use rayon::prelude::*;
use statrs::statistics::Statistics;

use crate::analysis::{
    compute_rsi, rank_results, round_to, scan_swings_with, ScreenCriteria, DEFAULT_RSI_WINDOW,
};
use crate::data::{Bar, ScanSummary, SwingThresholds, TickerResult};
use crate::sources::BarSource;

/// Everything the screener needs besides its data sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenConfig {
    pub criteria: ScreenCriteria,
    pub thresholds: SwingThresholds,
    pub rsi_window: usize,
    /// Worker threads; 0 lets rayon decide.
    pub jobs: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            criteria: ScreenCriteria::default(),
            thresholds: SwingThresholds::default(),
            rsi_window: DEFAULT_RSI_WINDOW,
            jobs: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScanProgress<'a> {
    pub completed: usize,
    pub total: usize,
    pub ticker: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Matched(TickerResult),
    Rejected(TickerResult),
    NoData,
    LowVolume(f64),
}

#[derive(Debug, Clone, Default)]
pub struct ScreenReport {
    pub results: Vec<TickerResult>,
    pub scanned: usize,
    pub failed: usize,
}

/// RSI and swing statistics for one ticker's full history.
pub fn analyse_bars(
    bars: &[Bar],
    config: &ScreenConfig,
) -> Result<(Vec<Option<f64>>, ScanSummary)> {
    let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
    let rsi = compute_rsi(&closes, config.rsi_window);
    let summary = scan_swings_with(bars, &rsi, config.criteria.min_gain_pct, config.thresholds)?;
    Ok((rsi, summary))
}

/// Apply the volume pre-filter, scan, and the swing/success filters.
pub fn evaluate_ticker(
    ticker: &str,
    bars: &[Bar],
    config: &ScreenConfig,
) -> Result<TickerOutcome> {
    if bars.is_empty() {
        return Ok(TickerOutcome::NoData);
    }

    let mean_volume = bars.iter().map(|bar| bar.volume).mean();
    if !config.criteria.meets_volume(mean_volume) {
        return Ok(TickerOutcome::LowVolume(mean_volume));
    }

    let (_, summary) = analyse_bars(bars, config)?;
    let mut result = TickerResult::from_summary(ticker, &summary);
    let accepted = config.criteria.accepts(&result);
    result.success_rate = round_to(result.success_rate, 2);

    if accepted {
        Ok(TickerOutcome::Matched(result))
    } else {
        Ok(TickerOutcome::Rejected(result))
    }
}

/// Screen every ticker in parallel and rank the matches.
///
/// A ticker whose history cannot be loaded or scanned is logged and skipped.
pub fn screen<S, F>(
    tickers: &[String],
    source: &S,
    config: &ScreenConfig,
    on_progress: F,
) -> Result<ScreenReport>
where
    S: BarSource + ?Sized,
    F: Fn(ScanProgress<'_>) + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .context("failed to build worker pool")?;

    let completed = AtomicUsize::new(0);
    let total = tickers.len();

    let outcomes: Vec<Option<TickerOutcome>> = pool.install(|| {
        tickers
            .par_iter()
            .map(|ticker| {
                let outcome = source
                    .bars(ticker)
                    .and_then(|bars| evaluate_ticker(ticker, &bars, config));
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                on_progress(ScanProgress {
                    completed: done,
                    total,
                    ticker,
                });
                match outcome {
                    Ok(outcome) => {
                        log_outcome(ticker, &outcome);
                        Some(outcome)
                    }
                    Err(err) => {
                        log::warn!("skipping {ticker}: {err:#}");
                        None
                    }
                }
            })
            .collect()
    });

    let failed = outcomes.iter().filter(|o| o.is_none()).count();
    let matched = outcomes
        .into_iter()
        .flatten()
        .filter_map(|outcome| match outcome {
            TickerOutcome::Matched(result) => Some(result),
            _ => None,
        })
        .collect();

    Ok(ScreenReport {
        results: rank_results(matched),
        scanned: total - failed,
        failed,
    })
}

fn log_outcome(ticker: &str, outcome: &TickerOutcome) {
    match outcome {
        TickerOutcome::Matched(result) => log::debug!(
            "{ticker}: {} swings, {:.2}% success",
            result.total_swings,
            result.success_rate
        ),
        TickerOutcome::Rejected(result) => log::debug!(
            "{ticker}: rejected with {} swings, {:.2}% success",
            result.total_swings,
            result.success_rate
        ),
        TickerOutcome::NoData => log::debug!("{ticker}: no usable bars"),
        TickerOutcome::LowVolume(volume) => {
            log::debug!("{ticker}: mean volume {volume:.0} below minimum")
        }
    }
}
