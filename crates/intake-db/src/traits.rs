use async_trait::async_trait;
use intake_core::constants::{
    BRAND_SUBMISSIONS_TABLE, BUSINESS_SUBMISSIONS_TABLE, FILES_TABLE, REGISTRATIONS_TABLE,
    UNIQUE_VIOLATION_CODE,
};
use intake_core::TableBackend;
use serde::Serialize;
use std::fmt;

/// The external tables this system writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Uploaded file metadata
    Files,
    BrandSubmissions,
    /// Carries a unique constraint on `unique_id`
    BusinessSubmissions,
    Registrations,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Files => FILES_TABLE,
            Table::BrandSubmissions => BRAND_SUBMISSIONS_TABLE,
            Table::BusinessSubmissions => BUSINESS_SUBMISSIONS_TABLE,
            Table::Registrations => REGISTRATIONS_TABLE,
        }
    }

    /// Columns the store keeps unique, besides the generated `id`.
    pub fn unique_columns(self) -> &'static [&'static str] {
        match self {
            Table::BusinessSubmissions => &["unique_id"],
            _ => &[],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Insert failure as reported by the store: an optional machine code (SQLSTATE
/// for Postgres-backed stores) and a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Insert failed [{}]: {message}", .code.as_deref().unwrap_or("-"))]
pub struct InsertError {
    pub code: Option<String>,
    pub message: String,
}

impl InsertError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Failure without a store-provided code (transport, serialization, ...)
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn unique_violation(message: impl Into<String>) -> Self {
        Self::new(UNIQUE_VIOLATION_CODE, message)
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION_CODE)
    }
}

#[async_trait]
pub trait TableWriter: Send + Sync {
    /// Insert one record (a JSON object keyed by column name) into `table`.
    async fn insert(&self, table: Table, record: serde_json::Value) -> Result<(), InsertError>;

    fn backend_type(&self) -> TableBackend;
}

/// Serialize `row` and insert it.
pub async fn insert_row<T>(
    writer: &dyn TableWriter,
    table: Table,
    row: &T,
) -> Result<(), InsertError>
where
    T: Serialize + ?Sized,
{
    let record = serde_json::to_value(row)
        .map_err(|e| InsertError::uncoded(format!("Failed to serialize row: {}", e)))?;

    if !record.is_object() {
        return Err(InsertError::uncoded("Row must serialize to a JSON object"));
    }

    writer.insert(table, record).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_match_store() {
        assert_eq!(Table::Files.name(), "lr_files");
        assert_eq!(Table::BrandSubmissions.name(), "lr_submissions");
        assert_eq!(Table::BusinessSubmissions.name(), "rne_submissions");
        assert_eq!(Table::Registrations.to_string(), "rne_registrations");
    }

    #[test]
    fn test_unique_violation_is_detected_by_code() {
        assert!(InsertError::new("23505", "duplicate").is_unique_violation());
        assert!(!InsertError::new("23502", "null value").is_unique_violation());
        assert!(!InsertError::uncoded("timeout").is_unique_violation());
    }

    #[test]
    fn test_display_includes_code() {
        let err = InsertError::new("23505", "duplicate key");
        assert_eq!(err.to_string(), "Insert failed [23505]: duplicate key");
        assert_eq!(
            InsertError::uncoded("boom").to_string(),
            "Insert failed [-]: boom"
        );
    }
}
