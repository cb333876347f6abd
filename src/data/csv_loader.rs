use crate::data::{normalize_series, parse_date};
use crate::models::PriceBar;
use crate::{Error, Result};
use csv::ReaderBuilder;
use std::fs::File;

#[derive(serde::Deserialize)]
struct BarRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

pub fn load_bars_from_csv(path: &str) -> Result<Vec<PriceBar>> {
    let file = File::open(path).map_err(|err| Error::new(format!("csv open failed: {err}")))?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut bars: Vec<PriceBar> = Vec::new();
    for result in reader.deserialize::<BarRow>() {
        let row = result.map_err(|err| Error::new(format!("csv parse failed: {err}")))?;
        let date = parse_date(&row.date)?;
        bars.push(PriceBar::new(
            date, row.open, row.high, row.low, row.close, row.volume,
        )?);
    }

    Ok(normalize_series(bars))
}
