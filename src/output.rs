use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::data::{Bar, ScanSummary, SwingThresholds, TickerResult};

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Swings")]
    swings: usize,
    #[tabled(rename = "Success Rate (%)")]
    success_rate: String,
    #[tabled(rename = "Successes")]
    successes: usize,
    #[tabled(rename = "Avg Volume")]
    mean_volume: u64,
}

#[derive(Tabled)]
struct SwingRow {
    #[tabled(rename = "Entry")]
    entry_date: String,
    #[tabled(rename = "Entry Price")]
    entry_price: String,
    #[tabled(rename = "Exit")]
    exit_date: String,
    #[tabled(rename = "Exit Price")]
    exit_price: String,
    #[tabled(rename = "Gain (%)")]
    gain: String,
    #[tabled(rename = "Met Target")]
    success: &'static str,
}

/// One row of the price/volume/RSI series used for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
    pub rsi: Option<f64>,
    pub oversold: f64,
    pub overbought: f64,
}

pub fn chart_points(
    bars: &[Bar],
    rsi: &[Option<f64>],
    thresholds: SwingThresholds,
) -> Vec<ChartPoint> {
    bars.iter()
        .zip(rsi)
        .map(|(bar, rsi)| ChartPoint {
            date: bar.timestamp,
            close: bar.close,
            volume: bar.volume,
            rsi: *rsi,
            oversold: thresholds.oversold,
            overbought: thresholds.overbought,
        })
        .collect()
}

pub fn results_table(results: &[TickerResult]) -> String {
    let rows = results.iter().map(|result| ResultRow {
        ticker: result.ticker.clone(),
        swings: result.total_swings,
        success_rate: format!("{:.2}", result.success_rate),
        successes: result.successes,
        mean_volume: result.mean_volume as u64,
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn print_results(results: &[TickerResult], thresholds: SwingThresholds) {
    println!(
        "\n=== RSI Swing Screener ({} -> {}) ===\n",
        thresholds.oversold, thresholds.overbought
    );
    if results.is_empty() {
        println!("No tickers matched the criteria.");
        return;
    }
    println!("{}\n", results_table(results));
}

pub fn print_swings(ticker: &str, bars: &[Bar], summary: &ScanSummary) {
    println!(
        "{ticker}: {} swings, {} met the gain target ({:.2}%), mean volume {:.0}",
        summary.total,
        summary.successes,
        summary.success_rate(),
        summary.mean_volume
    );
    if summary.swings.is_empty() {
        return;
    }

    let date_at = |index: usize| {
        bars.get(index)
            .map(|bar| bar.timestamp.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let rows: Vec<SwingRow> = summary
        .swings
        .iter()
        .map(|swing| SwingRow {
            entry_date: date_at(swing.entry_index),
            entry_price: format!("{:.2}", swing.entry_price),
            exit_date: date_at(swing.exit_index),
            exit_price: format!("{:.2}", swing.exit_price),
            gain: format!("{:+.2}", swing.gain_pct),
            success: if swing.success { "yes" } else { "no" },
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{table}\n");
}

pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
