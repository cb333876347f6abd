use crate::{Error, Result};
use chrono::NaiveDate;

#[derive(Clone, Debug, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Result<Self> {
        if open <= 0.0 || high <= 0.0 || low <= 0.0 || close <= 0.0 {
            return Err(Error::new("prices must be positive"));
        }
        if volume < 0 {
            return Err(Error::new("volume must be non-negative"));
        }
        let max_oc = open.max(close);
        let min_oc = open.min(close);
        if high < max_oc {
            return Err(Error::new("high must be >= max(open, close)"));
        }
        if low > min_oc {
            return Err(Error::new("low must be <= min(open, close)"));
        }
        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}
