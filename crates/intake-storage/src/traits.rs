//! Storage abstraction trait
//!
//! This module defines the ObjectStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use intake_core::StorageKey;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage abstraction trait
///
/// All storage backends (hosted API, local filesystem, memory) implement this
/// trait so the upload pipeline never depends on a specific backend.
///
/// Objects are never overwritten: putting a key that already exists in the
/// bucket fails with [`StorageError::AlreadyExists`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key` in `bucket`
    async fn put(
        &self,
        bucket: &str,
        key: &StorageKey,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<()>;

    /// Remove an object. Deleting a missing object is not an error.
    async fn delete(&self, bucket: &str, key: &StorageKey) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, bucket: &str, key: &StorageKey) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Reject keys and bucket names that could escape their namespace.
pub(crate) fn check_segment(kind: &str, value: &str) -> StorageResult<()> {
    if value.is_empty()
        || value.contains("..")
        || value.starts_with('/')
        || value.contains('\\')
        || value.contains('/')
    {
        return Err(StorageError::InvalidKey(format!(
            "{} contains invalid characters: {:?}",
            kind, value
        )));
    }
    Ok(())
}
