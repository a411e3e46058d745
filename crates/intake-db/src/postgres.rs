//! Direct Postgres writer
//!
//! Rows are handed to Postgres as `jsonb` and expanded with
//! `jsonb_populate_record`, so column types are taken from the table definition.
//! Only the columns present in the record are listed, which leaves `id` and
//! `created_at` to their defaults.

use crate::traits::{InsertError, Table, TableWriter};
use async_trait::async_trait;
use intake_core::TableBackend;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct PgTableWriter {
    pool: PgPool,
}

impl PgTableWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, timeout: Duration) -> Result<Self, InsertError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(timeout)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }
}

fn is_plain_identifier(column: &str) -> bool {
    !column.is_empty()
        && column
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Build the insert statement for the given column set.
fn insert_statement(table: Table, columns: &[&str]) -> Result<String, InsertError> {
    if columns.is_empty() {
        return Err(InsertError::uncoded("Row has no columns"));
    }
    if let Some(bad) = columns.iter().find(|c| !is_plain_identifier(c)) {
        let message = format!("Invalid column name: {}", bad);
        return Err(InsertError::uncoded(message));
    }

    let list = columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "INSERT INTO {table} ({list}) SELECT {list} FROM jsonb_populate_record(NULL::{table}, $1)",
        table = table.name(),
        list = list
    ))
}

fn map_sqlx_error(err: sqlx::Error) -> InsertError {
    match err {
        sqlx::Error::Database(db) => InsertError {
            code: db.code().map(|c| c.into_owned()),
            message: db.message().to_string(),
        },
        other => InsertError::uncoded(other.to_string()),
    }
}

#[async_trait]
impl TableWriter for PgTableWriter {
    #[tracing::instrument(skip(self, record), fields(db.table = %table, db.operation = "insert"))]
    async fn insert(&self, table: Table, record: serde_json::Value) -> Result<(), InsertError> {
        let columns: Vec<&str> = match record.as_object() {
            Some(object) => object.keys().map(String::as_str).collect(),
            None => return Err(InsertError::uncoded("Row must be a JSON object")),
        };
        let sql = insert_statement(table, &columns)?;

        sqlx::query(&sql)
            .bind(&record)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    fn backend_type(&self) -> TableBackend {
        TableBackend::Postgres
    }
}
