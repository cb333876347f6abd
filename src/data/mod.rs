pub mod csv_loader;
pub mod provider_loader;

use crate::config::Config;
use crate::models::PriceBar;
use crate::{Error, Result};
use chrono::NaiveDate;

pub fn load_bars(config: &Config) -> Result<Vec<PriceBar>> {
    match config.data.source.as_str() {
        "csv" => {
            let path = config
                .data
                .csv_path
                .as_ref()
                .ok_or_else(|| Error::new("data.csv_path must be set"))?;
            csv_loader::load_bars_from_csv(path)
        }
        "provider" => provider_loader::load_bars_from_provider(config),
        _ => Err(Error::new("unknown data source")),
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::new("date value is empty"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|err| Error::new(format!("invalid date format: {err}")))
}

pub fn normalize_series(bars: Vec<PriceBar>) -> Vec<PriceBar> {
    let mut rows: Vec<(NaiveDate, usize, PriceBar)> = bars
        .into_iter()
        .enumerate()
        .map(|(index, bar)| (bar.date, index, bar))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let mut deduped: Vec<PriceBar> = Vec::new();
    for (_, _, bar) in rows {
        if let Some(last) = deduped.last_mut() {
            if last.date == bar.date {
                *last = bar;
                continue;
            }
        }
        deduped.push(bar);
    }

    deduped
}
