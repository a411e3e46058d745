#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-remote")]
use crate::RemoteStorage;
use crate::{MemoryStorage, ObjectStore, StorageBackend, StorageError, StorageResult};
use intake_core::IntakeConfig;
use std::sync::Arc;

/// Create an object store based on configuration
pub async fn create_object_store(config: &IntakeConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-remote")]
        StorageBackend::Remote => {
            let base_url = config.backend_url.as_deref().ok_or_else(|| {
                StorageError::ConfigError("INTAKE_BACKEND_URL not configured".to_string())
            })?;
            let api_key = config.api_key.as_deref().ok_or_else(|| {
                StorageError::ConfigError("INTAKE_API_KEY not configured".to_string())
            })?;

            let storage = RemoteStorage::new(
                base_url,
                api_key,
                std::time::Duration::from_secs(config.http_timeout_secs),
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-remote"))]
        StorageBackend::Remote => Err(StorageError::ConfigError(
            "Remote storage backend not available (storage-remote feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.as_deref().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
    }
}
