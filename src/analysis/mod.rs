pub mod rsi;
pub mod stats;
pub mod swings;

pub use rsi::{compute_rsi, DEFAULT_RSI_WINDOW, FLAT_RSI};
pub use stats::{rank_results, round_to, ScreenCriteria};
pub use swings::{scan_swings, scan_swings_with, ScanError, SwingScanner};
