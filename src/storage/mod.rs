pub mod memory;
pub mod postgres;

use crate::models::PriceBar;
use crate::Result;
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableStatus {
    Exists,
    NotFound,
}

pub trait BarStore {
    fn table_status(&mut self) -> Result<TableStatus>;
    fn existing_dates(&mut self) -> Result<HashSet<NaiveDate>>;
    fn create_with_bars(&mut self, bars: &[PriceBar]) -> Result<usize>;
    fn append_bars(&mut self, bars: &[PriceBar]) -> Result<usize>;
    fn replace_all(&mut self, bars: &[PriceBar]) -> Result<usize>;
}
