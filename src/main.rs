use std::fs::File;

use anyhow::{bail, Context, Result};
use clap::Parser;

use rsi_swing_screener::output::{chart_points, print_results, print_swings, write_csv};
use rsi_swing_screener::screener::{analyse_bars, ScanProgress};
use rsi_swing_screener::sources::{
    resolve_tickers, BarSource, CsvBarDirectory, CsvTickerList, StaticTickers,
};
use rsi_swing_screener::{screen, AppConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = AppConfig::parse();
    run(&config)
}

fn run(config: &AppConfig) -> Result<()> {
    if !config.data_dir.is_dir() {
        bail!("data directory {:?} does not exist", config.data_dir);
    }

    let fallback = StaticTickers::fallback();
    let tickers = match &config.tickers_path {
        Some(path) => {
            let list = CsvTickerList::new(path, config.suffix.as_str());
            resolve_tickers(&list, &fallback)?
        }
        None => fallback.0.clone(),
    };
    log::info!("screening {} tickers from {:?}", tickers.len(), config.data_dir);

    let screen_config = config.screen_config();
    let source = CsvBarDirectory::new(&config.data_dir);
    let report = screen(&tickers, &source, &screen_config, |progress: ScanProgress<'_>| {
        log::debug!(
            "[{}/{}] analysed {}",
            progress.completed,
            progress.total,
            progress.ticker
        );
    })?;
    log::info!(
        "analysis finished: {} scanned, {} skipped, {} matched",
        report.scanned,
        report.failed,
        report.results.len()
    );

    print_results(&report.results, screen_config.thresholds);

    if let Some(path) = &config.results_out {
        let file = File::create(path).with_context(|| format!("failed to create {:?}", path))?;
        write_csv(file, &report.results)?;
        log::info!("wrote results to {:?}", path);
    }

    if let Some(ticker) = &config.chart {
        let bars = source
            .bars(ticker)
            .with_context(|| format!("failed to load history for {ticker}"))?;
        let (rsi, summary) = analyse_bars(&bars, &screen_config)?;
        print_swings(ticker, &bars, &summary);

        if let Some(path) = &config.chart_out {
            let points = chart_points(&bars, &rsi, screen_config.thresholds);
            let file =
                File::create(path).with_context(|| format!("failed to create {:?}", path))?;
            write_csv(file, &points)?;
            log::info!("wrote {} chart rows for {ticker} to {:?}", points.len(), path);
        }
    }

    Ok(())
}
