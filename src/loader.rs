use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use thiserror::Error;

use crate::data::Bar;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("unable to parse date from value '{0}'")]
    Timestamp(String),

    #[error("failed to parse numeric field '{field}' from value '{value}'")]
    ParseNumber { field: &'static str, value: String },

    #[error("duplicate bar for {0}")]
    DuplicateTimestamp(NaiveDate),

    #[error("non-positive close {close} on {date}")]
    NonPositiveClose { date: NaiveDate, close: f64 },
}

struct Columns {
    date: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, LoaderError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(LoaderError::MissingColumn(name))
        };
        Ok(Self {
            date: find("date")?,
            close: find("close")?,
            volume: find("volume")?,
        })
    }
}

pub fn load_bars_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("failed to open {:?}", path_ref))?;
    read_bars(file).with_context(|| format!("failed to read bars from {:?}", path_ref))
}

/// Parse daily bars from CSV with `Date`, `Close` and `Volume` headers.
///
/// Rows with a blank or `NaN` close or volume are dropped; infinite values
/// are errors. The result is sorted by date and may be empty.
pub fn read_bars<R: Read>(source: R) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let columns = Columns::locate(reader.headers()?)?;

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if let Some(bar) = parse_record(&record, &columns)? {
            bars.push(bar);
        }
    }

    bars.sort_by_key(|bar| bar.timestamp);
    Ok(bars)
}

fn parse_record(record: &StringRecord, columns: &Columns) -> Result<Option<Bar>, LoaderError> {
    let close = parse_optional_number(record.get(columns.close), "close")?;
    let volume = parse_optional_number(record.get(columns.volume), "volume")?;
    let (Some(close), Some(volume)) = (close, volume) else {
        return Ok(None);
    };

    let raw_date = record.get(columns.date).unwrap_or_default();
    let timestamp = parse_date(raw_date)?;

    Ok(Some(Bar {
        timestamp,
        close,
        volume,
    }))
}

fn parse_optional_number(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<f64>, LoaderError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let parsed = value
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| LoaderError::ParseNumber {
            field,
            value: value.to_string(),
        })?;
    if parsed.is_nan() {
        return Ok(None);
    }
    if !parsed.is_finite() {
        return Err(LoaderError::ParseNumber {
            field,
            value: value.to_string(),
        });
    }
    Ok(Some(parsed))
}

fn parse_date(value: &str) -> Result<NaiveDate, LoaderError> {
    let trimmed = value.trim();
    let date_patterns = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
    for pattern in &date_patterns {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, pattern) {
            return Ok(date);
        }
    }

    let datetime_patterns = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%:z",
        "%Y-%m-%dT%H:%M:%S%:z",
    ];
    for pattern in &datetime_patterns {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(datetime.date());
        }
    }

    Err(LoaderError::Timestamp(trimmed.to_string()))
}

pub fn validate_series(bars: &[Bar]) -> Result<(), LoaderError> {
    for pair in bars.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(LoaderError::DuplicateTimestamp(pair[1].timestamp));
        }
    }
    for bar in bars {
        if bar.close <= 0.0 {
            return Err(LoaderError::NonPositiveClose {
                date: bar.timestamp,
                close: bar.close,
            });
        }
    }
    Ok(())
}
