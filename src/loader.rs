use crate::models::PriceBar;
use crate::storage::{BarStore, TableStatus};
use crate::Result;
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    TableCreated { rows: usize },
    Appended { rows: usize },
    NothingNew,
    Replaced { rows: usize },
}

impl LoadOutcome {
    pub fn rows_written(&self) -> usize {
        match self {
            LoadOutcome::TableCreated { rows } => *rows,
            LoadOutcome::Appended { rows } => *rows,
            LoadOutcome::NothingNew => 0,
            LoadOutcome::Replaced { rows } => *rows,
        }
    }
}

pub fn compute_delta(bars: &[PriceBar], existing: &HashSet<NaiveDate>) -> Vec<PriceBar> {
    bars.iter()
        .filter(|bar| !existing.contains(&bar.date))
        .cloned()
        .collect()
}

pub fn run_append(store: &mut dyn BarStore, bars: &[PriceBar]) -> Result<LoadOutcome> {
    match store.table_status()? {
        TableStatus::NotFound => {
            let rows = store.create_with_bars(bars)?;
            Ok(LoadOutcome::TableCreated { rows })
        }
        TableStatus::Exists => {
            let existing = store.existing_dates()?;
            let delta = compute_delta(bars, &existing);
            if delta.is_empty() {
                return Ok(LoadOutcome::NothingNew);
            }
            let rows = store.append_bars(&delta)?;
            Ok(LoadOutcome::Appended { rows })
        }
    }
}

pub fn run_replace(store: &mut dyn BarStore, bars: &[PriceBar]) -> Result<LoadOutcome> {
    let rows = store.replace_all(bars)?;
    Ok(LoadOutcome::Replaced { rows })
}
