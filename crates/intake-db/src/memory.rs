//! In-memory table writer
//!
//! Emulates the parts of the store this system relies on: generated `id` and
//! `created_at` columns and the unique constraint on business submission
//! identifiers (reported with code `23505`).

use crate::traits::{InsertError, Table, TableWriter};
use async_trait::async_trait;
use chrono::Utc;
use intake_core::TableBackend;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryTableWriter {
    rows: Mutex<HashMap<Table, Vec<Map<String, Value>>>>,
    failures: Mutex<HashMap<Table, InsertError>>,
}

impl MemoryTableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every insert into `table` fail with `error` until cleared with `None`.
    pub fn fail_inserts(&self, table: Table, error: Option<InsertError>) {
        if let Ok(mut failures) = self.failures.lock() {
            match error {
                Some(error) => {
                    failures.insert(table, error);
                }
                None => {
                    failures.remove(&table);
                }
            }
        }
    }

    /// Rows stored in `table`, in insertion order.
    pub fn rows(&self, table: Table) -> Vec<Map<String, Value>> {
        self.rows
            .lock()
            .ok()
            .and_then(|rows| rows.get(&table).cloned())
            .unwrap_or_default()
    }

    pub fn count(&self, table: Table) -> usize {
        self.rows
            .lock()
            .map(|rows| rows.get(&table).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl TableWriter for MemoryTableWriter {
    async fn insert(&self, table: Table, record: Value) -> Result<(), InsertError> {
        if let Some(error) = self
            .failures
            .lock()
            .ok()
            .and_then(|failures| failures.get(&table).cloned())
        {
            return Err(error);
        }

        let Value::Object(mut record) = record else {
            return Err(InsertError::uncoded("Row must be a JSON object"));
        };

        let mut rows = self
            .rows
            .lock()
            .map_err(|_| InsertError::uncoded("memory table lock poisoned"))?;
        let existing = rows.entry(table).or_default();

        for column in table.unique_columns() {
            let Some(value) = record.get(*column) else {
                continue;
            };
            if existing.iter().any(|row| row.get(*column) == Some(value)) {
                return Err(InsertError::unique_violation(format!(
                    "duplicate key value violates unique constraint \"{}_{}_key\"",
                    table, column
                )));
            }
        }

        record
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        record
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        existing.push(record);

        tracing::debug!(table = %table, "Row stored in memory");
        Ok(())
    }

    fn backend_type(&self) -> TableBackend {
        TableBackend::Memory
    }
}
