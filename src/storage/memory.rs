use crate::models::PriceBar;
use crate::storage::{BarStore, TableStatus};
use crate::Result;
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Option<Vec<PriceBar>>,
    write_calls: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<PriceBar>) -> Self {
        Self {
            rows: Some(rows),
            write_calls: 0,
        }
    }

    pub fn rows(&self) -> &[PriceBar] {
        self.rows.as_deref().unwrap_or(&[])
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls
    }
}

impl BarStore for MemoryStore {
    fn table_status(&mut self) -> Result<TableStatus> {
        Ok(if self.rows.is_some() {
            TableStatus::Exists
        } else {
            TableStatus::NotFound
        })
    }

    fn existing_dates(&mut self) -> Result<HashSet<NaiveDate>> {
        Ok(self.rows().iter().map(|bar| bar.date).collect())
    }

    fn create_with_bars(&mut self, bars: &[PriceBar]) -> Result<usize> {
        self.write_calls += 1;
        self.rows = Some(bars.to_vec());
        Ok(bars.len())
    }

    fn append_bars(&mut self, bars: &[PriceBar]) -> Result<usize> {
        self.write_calls += 1;
        let rows = self.rows.get_or_insert_with(Vec::new);
        rows.extend_from_slice(bars);
        Ok(bars.len())
    }

    fn replace_all(&mut self, bars: &[PriceBar]) -> Result<usize> {
        self.write_calls += 1;
        self.rows = Some(bars.to_vec());
        Ok(bars.len())
    }
}
