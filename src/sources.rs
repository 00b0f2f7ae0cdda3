use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::data::Bar;
use crate::loader::{load_bars_from_csv, validate_series, LoaderError};

pub const FALLBACK_TICKERS: [&str; 5] = ["EQNR.OL", "NHY.OL", "MOWI.OL", "ORK.OL", "TEL.OL"];

/// Supplies the ordered universe of symbols to screen.
pub trait TickerSource {
    fn tickers(&self) -> Result<Vec<String>>;
}

/// Supplies the daily history for one symbol.
pub trait BarSource: Sync {
    fn bars(&self, ticker: &str) -> Result<Vec<Bar>>;
}

#[derive(Debug, Clone)]
pub struct StaticTickers(pub Vec<String>);

impl StaticTickers {
    pub fn fallback() -> Self {
        Self(FALLBACK_TICKERS.iter().map(|t| t.to_string()).collect())
    }
}

impl TickerSource for StaticTickers {
    fn tickers(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Ticker list read from a CSV file with a `Ticker` column.
#[derive(Debug, Clone)]
pub struct CsvTickerList {
    pub path: PathBuf,
    pub suffix: String,
}

impl CsvTickerList {
    pub fn new(path: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            suffix: suffix.into(),
        }
    }
}

impl TickerSource for CsvTickerList {
    fn tickers(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open ticker list {:?}", self.path))?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        let column = reader
            .headers()?
            .iter()
            .position(|h| h.eq_ignore_ascii_case("ticker"))
            .ok_or(LoaderError::MissingColumn("ticker"))?;

        let mut symbols = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(symbol) = record.get(column).filter(|s| !s.is_empty()) {
                symbols.push(symbol.to_string());
            }
        }

        Ok(symbols
            .into_iter()
            .map(|symbol| with_suffix(&symbol, &self.suffix))
            .unique()
            .collect())
    }
}

fn with_suffix(symbol: &str, suffix: &str) -> String {
    if suffix.is_empty() || symbol.ends_with(suffix) {
        symbol.to_string()
    } else {
        format!("{symbol}{suffix}")
    }
}

/// Use `primary` when it yields symbols, otherwise warn and use `fallback`.
pub fn resolve_tickers(
    primary: &dyn TickerSource,
    fallback: &dyn TickerSource,
) -> Result<Vec<String>> {
    match primary.tickers() {
        Ok(tickers) if !tickers.is_empty() => Ok(tickers),
        Ok(_) => {
            log::warn!("ticker list is empty, using fallback list");
            fallback.tickers()
        }
        Err(err) => {
            log::warn!("could not load ticker list, using fallback list ({err:#})");
            fallback.tickers()
        }
    }
}

/// Reads `<dir>/<TICKER>.csv` for each symbol.
#[derive(Debug, Clone)]
pub struct CsvBarDirectory {
    pub dir: PathBuf,
}

impl CsvBarDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }
}

impl BarSource for CsvBarDirectory {
    fn bars(&self, ticker: &str) -> Result<Vec<Bar>> {
        let path = self.path_for(ticker);
        if !path.exists() {
            anyhow::bail!("no history file for {ticker} at {:?}", path);
        }
        let bars = load_bars_from_csv(&path)?;
        validate_series(&bars).with_context(|| format!("invalid history for {ticker}"))?;
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct Failing;

    impl TickerSource for Failing {
        fn tickers(&self) -> Result<Vec<String>> {
            anyhow::bail!("network unreachable")
        }
    }

    #[test]
    fn csv_list_is_trimmed_deduplicated_and_suffixed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Ticker,Name").unwrap();
        writeln!(file, " EQNR ,Equinor").unwrap();
        writeln!(file, "NHY,Norsk Hydro").unwrap();
        writeln!(file, ",Unknown").unwrap();
        writeln!(file, "EQNR,Equinor again").unwrap();
        writeln!(file, "TEL.OL,Telenor").unwrap();

        let list = CsvTickerList::new(file.path(), ".OL");
        assert_eq!(list.tickers().unwrap(), ["EQNR.OL", "NHY.OL", "TEL.OL"]);
    }

    #[test]
    fn bare_and_suffixed_symbols_collapse_to_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Ticker").unwrap();
        writeln!(file, "TEL").unwrap();
        writeln!(file, "ORK").unwrap();
        writeln!(file, "TEL.OL").unwrap();

        let list = CsvTickerList::new(file.path(), ".OL");
        assert_eq!(list.tickers().unwrap(), ["TEL.OL", "ORK.OL"]);
    }

    #[test]
    fn fallback_is_used_when_primary_fails() {
        let tickers = resolve_tickers(&Failing, &StaticTickers::fallback()).unwrap();
        assert_eq!(tickers, FALLBACK_TICKERS);
    }

    #[test]
    fn fallback_is_used_when_primary_is_empty() {
        let empty = StaticTickers(Vec::new());
        let fallback = StaticTickers(vec!["ORK.OL".to_string()]);
        assert_eq!(resolve_tickers(&empty, &fallback).unwrap(), ["ORK.OL"]);
    }

    #[test]
    fn missing_history_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvBarDirectory::new(dir.path());
        assert!(source.bars("NOPE.OL").is_err());
    }
}
