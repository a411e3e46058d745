//! Hosted object storage backend
//!
//! Talks to the storage API of the backend-as-a-service:
//!
//! - `POST   {base}/storage/v1/object/{bucket}/{key}` uploads an object
//! - `HEAD   {base}/storage/v1/object/{bucket}/{key}` checks existence
//! - `DELETE {base}/storage/v1/object/{bucket}` with `{"prefixes": [key]}` removes it

use crate::traits::{check_segment, ObjectStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use intake_core::StorageKey;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Error body returned by the storage API
#[derive(Debug, Deserialize)]
struct StorageApiError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RemoteStorage {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RemoteStorage {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> StorageResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            StorageError::ConfigError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn object_url(&self, bucket: &str, key: &StorageKey) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            urlencoding::encode(bucket),
            urlencoding::encode(key.as_str())
        )
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Human-readable reason from an error response.
    async fn error_text(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<StorageApiError>(&body)
            .ok()
            .and_then(|parsed| parsed.message.or(parsed.error));
        match detail {
            Some(detail) => format!("{}: {}", status, detail),
            None if body.is_empty() => status.to_string(),
            None => format!("{}: {}", status, body),
        }
    }
}

#[async_trait]
impl ObjectStore for RemoteStorage {
    #[tracing::instrument(skip_all, fields(bucket = %bucket, key = %key, bytes = data.len()))]
    async fn put(
        &self,
        bucket: &str,
        key: &StorageKey,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<()> {
        check_segment("bucket", bucket)?;
        check_segment("key", key.as_str())?;

        let request = self
            .client
            .post(self.object_url(bucket, key))
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(data);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let reason = Self::error_text(response).await;
        tracing::warn!(status = %status, reason = %reason, "Storage API rejected upload");
        if status == StatusCode::CONFLICT {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }
        Err(StorageError::UploadFailed(reason))
    }

    #[tracing::instrument(skip_all, fields(bucket = %bucket, key = %key))]
    async fn delete(&self, bucket: &str, key: &StorageKey) -> StorageResult<()> {
        check_segment("bucket", bucket)?;
        check_segment("key", key.as_str())?;

        let url = format!(
            "{}/storage/v1/object/{}",
            self.base_url,
            urlencoding::encode(bucket)
        );
        let request = self
            .client
            .delete(url)
            .json(&serde_json::json!({ "prefixes": [key.as_str()] }));
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let reason = Self::error_text(response).await;
        Err(StorageError::DeleteFailed(reason))
    }

    async fn exists(&self, bucket: &str, key: &StorageKey) -> StorageResult<bool> {
        check_segment("bucket", bucket)?;
        check_segment("key", key.as_str())?;

        let request = self.client.head(self.object_url(bucket, key));
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            _ => {
                let reason = Self::error_text(response).await;
                Err(StorageError::BackendError(reason))
            }
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Remote
    }
}
