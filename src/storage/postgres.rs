use crate::config::StorageConfig;
use crate::models::PriceBar;
use crate::storage::{BarStore, TableStatus};
use crate::{Error, Result};
use chrono::NaiveDate;
use postgres::types::ToSql;
use postgres::{Client, NoTls, Transaction};
use std::collections::HashSet;

const SCHEMA_SQL: &str = include_str!("../../DB_SCHEMA.sql");
const INSERT_CHUNK_ROWS: usize = 1000;
const COLUMNS_PER_ROW: usize = 6;

pub struct PostgresStore {
    client: Client,
    table: String,
}

impl PostgresStore {
    pub fn connect(config: &StorageConfig) -> Result<Self> {
        let client = Client::connect(&config.postgres_dsn, NoTls)
            .map_err(|err| Error::new(format!("postgres connect failed: {err}")))?;
        Ok(Self {
            client,
            table: config.table.clone(),
        })
    }
}

impl BarStore for PostgresStore {
    fn table_status(&mut self) -> Result<TableStatus> {
        let row = self
            .client
            .query_one("SELECT to_regclass($1) IS NOT NULL", &[&self.table])
            .map_err(|err| Error::new(format!("table status query failed: {err}")))?;
        let exists: bool = row.get(0);
        Ok(if exists {
            TableStatus::Exists
        } else {
            TableStatus::NotFound
        })
    }

    fn existing_dates(&mut self) -> Result<HashSet<NaiveDate>> {
        let sql = format!("SELECT date FROM {}", self.table);
        let rows = self
            .client
            .query(sql.as_str(), &[])
            .map_err(|err| Error::new(format!("existing dates query failed: {err}")))?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    fn create_with_bars(&mut self, bars: &[PriceBar]) -> Result<usize> {
        let mut tx = self
            .client
            .transaction()
            .map_err(|err| Error::new(format!("db transaction failed: {err}")))?;
        execute_schema(&mut tx, &self.table)?;
        let rows = insert_bars(&mut tx, &self.table, bars)?;
        tx.commit()
            .map_err(|err| Error::new(format!("db commit failed: {err}")))?;
        Ok(rows)
    }

    fn append_bars(&mut self, bars: &[PriceBar]) -> Result<usize> {
        let mut tx = self
            .client
            .transaction()
            .map_err(|err| Error::new(format!("db transaction failed: {err}")))?;
        let rows = insert_bars(&mut tx, &self.table, bars)?;
        tx.commit()
            .map_err(|err| Error::new(format!("db commit failed: {err}")))?;
        Ok(rows)
    }

    fn replace_all(&mut self, bars: &[PriceBar]) -> Result<usize> {
        let mut tx = self
            .client
            .transaction()
            .map_err(|err| Error::new(format!("db transaction failed: {err}")))?;
        tx.batch_execute(&format!("DROP TABLE IF EXISTS {}", self.table))
            .map_err(|err| Error::new(format!("drop table failed: {err}")))?;
        execute_schema(&mut tx, &self.table)?;
        let rows = insert_bars(&mut tx, &self.table, bars)?;
        tx.commit()
            .map_err(|err| Error::new(format!("db commit failed: {err}")))?;
        Ok(rows)
    }
}

fn execute_schema(tx: &mut Transaction<'_>, table: &str) -> Result<()> {
    let schema = SCHEMA_SQL.replace("price_bars", table);
    for statement in split_statements(&schema) {
        if statement.trim().is_empty() {
            continue;
        }
        tx.batch_execute(&statement)
            .map_err(|err| Error::new(format!("schema execute failed: {err}")))?;
    }
    Ok(())
}

fn insert_bars(tx: &mut Transaction<'_>, table: &str, bars: &[PriceBar]) -> Result<usize> {
    if bars.is_empty() {
        return Ok(0);
    }

    for chunk in bars.chunks(INSERT_CHUNK_ROWS) {
        let mut placeholders = Vec::with_capacity(chunk.len());
        let mut params: Vec<&(dyn ToSql + Sync)> =
            Vec::with_capacity(chunk.len() * COLUMNS_PER_ROW);
        for (row_index, bar) in chunk.iter().enumerate() {
            let base = row_index * COLUMNS_PER_ROW;
            placeholders.push(format!(
                "(${}, ${}, ${}, ${}, ${}, ${})",
                base + 1,
                base + 2,
                base + 3,
                base + 4,
                base + 5,
                base + 6
            ));
            params.push(&bar.date);
            params.push(&bar.open);
            params.push(&bar.high);
            params.push(&bar.low);
            params.push(&bar.close);
            params.push(&bar.volume);
        }

        let sql = format!(
            "INSERT INTO {table} (date, open, high, low, close, volume) VALUES {}",
            placeholders.join(", ")
        );
        tx.execute(sql.as_str(), &params)
            .map_err(|err| Error::new(format!("insert bars failed: {err}")))?;
    }

    Ok(bars.len())
}

fn split_statements(sql: &str) -> Vec<String> {
    let mut cleaned = String::new();
    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        cleaned.push_str(line);
        cleaned.push('\n');
    }
    cleaned
        .split(';')
        .map(|statement| statement.trim().to_string())
        .filter(|statement| !statement.is_empty())
        .collect()
}
