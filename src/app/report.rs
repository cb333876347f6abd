use crate::app::summary::SeriesSummary;
use crate::models::PriceBar;
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct BarReport {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

#[derive(Serialize)]
struct SummaryReport {
    symbol: String,
    last_close: f64,
    change: f64,
    percent_change: f64,
    average_volume: f64,
    period_high: f64,
    period_low: f64,
    first_date: String,
    last_date: String,
    day_count: usize,
}

#[derive(Serialize)]
struct SeriesReport {
    summary: SummaryReport,
    bars: Vec<BarReport>,
}

pub fn write_output(
    path: &str,
    format: &str,
    summary: &SeriesSummary,
    bars: &[PriceBar],
) -> Result<()> {
    match format {
        "json" => write_json(path, summary, bars),
        "csv" => write_csv(path, bars),
        "none" => Ok(()),
        _ => Err(Error::new("output.format must be none, json, or csv")),
    }
}

fn write_json(path: &str, summary: &SeriesSummary, bars: &[PriceBar]) -> Result<()> {
    ensure_parent_dir(path)?;
    let report = SeriesReport {
        summary: build_summary_report(summary),
        bars: bars.iter().map(build_bar_report).collect(),
    };
    let payload = serde_json::to_string_pretty(&report)
        .map_err(|err| Error::new(format!("json serialization failed: {err}")))?;
    fs::write(path, payload).map_err(|err| Error::new(format!("write failed: {err}")))?;
    Ok(())
}

fn write_csv(path: &str, bars: &[PriceBar]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)
        .map_err(|err| Error::new(format!("csv open failed: {err}")))?;
    for bar in bars {
        writer
            .serialize(build_bar_report(bar))
            .map_err(|err| Error::new(format!("csv write failed: {err}")))?;
    }
    writer
        .flush()
        .map_err(|err| Error::new(format!("csv flush failed: {err}")))?;
    Ok(())
}

fn build_summary_report(summary: &SeriesSummary) -> SummaryReport {
    SummaryReport {
        symbol: summary.symbol.clone(),
        last_close: summary.last_close,
        change: summary.change,
        percent_change: summary.percent_change,
        average_volume: summary.average_volume,
        period_high: summary.period_high,
        period_low: summary.period_low,
        first_date: summary.first_date.to_string(),
        last_date: summary.last_date.to_string(),
        day_count: summary.day_count,
    }
}

fn build_bar_report(bar: &PriceBar) -> BarReport {
    BarReport {
        date: bar.date.to_string(),
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        volume: bar.volume,
    }
}

fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| Error::new(format!("create output dir failed: {err}")))?;
        }
    }
    Ok(())
}
