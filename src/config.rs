use std::path::PathBuf;

use clap::Parser;

use crate::analysis::ScreenCriteria;
use crate::data::SwingThresholds;
use crate::screener::ScreenConfig;

/// Command-line configuration for the RSI swing screener.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Directory holding one `<TICKER>.csv` daily history per symbol.
    #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// CSV file with a `Ticker` column; the built-in list is used when unreadable.
    #[arg(short = 't', long = "tickers", value_name = "FILE")]
    pub tickers_path: Option<PathBuf>,

    /// Exchange suffix appended to symbols from the ticker list.
    #[arg(long, default_value = ".OL")]
    pub suffix: String,

    /// Minimum number of completed RSI swings.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=200))]
    pub min_swings: u32,

    /// Minimum price gain (%) between the oversold entry and overbought exit.
    #[arg(long, default_value_t = 10.0)]
    pub min_gain: f64,

    /// Minimum share (%) of swings that met the gain target.
    #[arg(long, default_value_t = 50.0)]
    pub min_success_rate: f64,

    /// Minimum mean daily volume.
    #[arg(long, default_value_t = 100_000.0)]
    pub min_volume: f64,

    /// RSI smoothing window.
    #[arg(long, default_value_t = 14)]
    pub rsi_window: usize,

    /// RSI level treated as oversold.
    #[arg(long, default_value_t = 20.0)]
    pub oversold: f64,

    /// RSI level treated as overbought.
    #[arg(long, default_value_t = 70.0)]
    pub overbought: f64,

    /// Worker threads (0 uses every core).
    #[arg(short = 'j', long, default_value_t = 0)]
    pub jobs: usize,

    /// Print swings for one ticker.
    #[arg(long, value_name = "TICKER")]
    pub chart: Option<String>,

    /// Write the charted ticker's price, volume and RSI series as CSV.
    #[arg(long, value_name = "FILE", requires = "chart")]
    pub chart_out: Option<PathBuf>,

    /// Write the ranked results as CSV.
    #[arg(long, value_name = "FILE")]
    pub results_out: Option<PathBuf>,
}

impl AppConfig {
    pub fn screen_config(&self) -> ScreenConfig {
        ScreenConfig {
            criteria: ScreenCriteria {
                min_swings: self.min_swings as usize,
                min_gain_pct: self.min_gain,
                min_success_rate: self.min_success_rate,
                min_volume: self.min_volume,
            },
            thresholds: SwingThresholds {
                oversold: self.oversold,
                overbought: self.overbought,
            },
            rsi_window: self.rsi_window,
            jobs: self.jobs,
        }
    }
}
