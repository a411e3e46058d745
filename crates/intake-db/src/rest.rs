//! PostgREST-style table API of the hosted backend
//!
//! `POST {base}/rest/v1/{table}` with a one-element JSON array body. Error bodies
//! look like `{"code": "23505", "message": "...", "details": "...", "hint": null}`.

use crate::traits::{InsertError, Table, TableWriter};
use async_trait::async_trait;
use intake_core::TableBackend;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RestApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// HTTP table writer with API-key auth.
#[derive(Clone, Debug)]
pub struct RestTableWriter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestTableWriter {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, InsertError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InsertError::uncoded(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn build_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
    }
}

#[async_trait]
impl TableWriter for RestTableWriter {
    #[tracing::instrument(skip(self, record), fields(db.table = %table, db.operation = "insert"))]
    async fn insert(&self, table: Table, record: serde_json::Value) -> Result<(), InsertError> {
        let request = self
            .client
            .post(self.build_url(table))
            .header("Prefer", "return=minimal")
            .json(&[record]);

        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| InsertError::uncoded(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let error = match serde_json::from_str::<RestApiError>(&body) {
            Ok(api) => InsertError {
                code: api.code,
                message: match (api.message, api.details) {
                    (Some(message), Some(details)) => format!("{} ({})", message, details),
                    (Some(message), None) => message,
                    (None, Some(details)) => details,
                    (None, None) => status.to_string(),
                },
            },
            Err(_) if body.is_empty() => InsertError::uncoded(status.to_string()),
            Err(_) => InsertError::uncoded(format!("{}: {}", status, body)),
        };

        tracing::warn!(status = %status, code = ?error.code, "Table API rejected insert");
        Err(error)
    }

    fn backend_type(&self) -> TableBackend {
        TableBackend::Rest
    }
}
