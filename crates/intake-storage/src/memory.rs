//! In-memory object store
//!
//! Used by tests and for local development with `STORAGE_BACKEND=memory`. Failures
//! can be scripted to exercise the pipeline's error paths.

use crate::traits::{check_segment, ObjectStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use intake_core::StorageKey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub data: Bytes,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
    put_calls: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail with a backend error.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete` fail with a backend error.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of `put` calls received, successful or not.
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, bucket: &str, key: &StorageKey) -> Option<StoredObject> {
        self.objects
            .read()
            .ok()?
            .get(&(bucket.to_string(), key.as_str().to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> StorageError {
        StorageError::BackendError("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl ObjectStore for MemoryStorage {
    async fn put(
        &self,
        bucket: &str,
        key: &StorageKey,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        check_segment("bucket", bucket)?;
        check_segment("key", key.as_str())?;

        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "scripted upload failure".to_string(),
            ));
        }

        let mut objects = self.objects.write().map_err(|_| Self::poisoned())?;
        let id = (bucket.to_string(), key.as_str().to_string());
        if objects.contains_key(&id) {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }
        objects.insert(
            id,
            StoredObject {
                content_type: content_type.to_string(),
                data,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &StorageKey) -> StorageResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed(
                "scripted delete failure".to_string(),
            ));
        }

        let mut objects = self.objects.write().map_err(|_| Self::poisoned())?;
        objects.remove(&(bucket.to_string(), key.as_str().to_string()));
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &StorageKey) -> StorageResult<bool> {
        let objects = self.objects.read().map_err(|_| Self::poisoned())?;
        Ok(objects.contains_key(&(bucket.to_string(), key.as_str().to_string())))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
