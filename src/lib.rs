pub mod analysis;
pub mod config;
pub mod data;
pub mod loader;
pub mod output;
pub mod screener;
pub mod sources;

pub use analysis::{compute_rsi, scan_swings, ScanError};
pub use config::AppConfig;
pub use data::{Bar, ScanSummary, Swing, SwingState, SwingThresholds, TickerResult};
pub use screener::{screen, ScreenConfig, ScreenReport};
