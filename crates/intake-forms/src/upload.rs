//! Upload pipeline: validate → name → store → record.
//!
//! A selected file is checked by the [`FileGate`], stored under a fresh
//! `{uuid}.{ext}` key, and described by a row in the files table. The key is
//! returned to the caller only when both remote calls succeed. Progress is
//! published on a `watch` channel so a front-end can render it.
//!
//! If the metadata insert fails after the object was stored, the object is
//! deleted again (unless `cleanup_orphans` is turned off) so no unreferenced
//! objects are left behind.

use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::watch;

use intake_core::constants::DEFAULT_UPLOAD_BUCKET;
use intake_core::error::log_error;
use intake_core::models::NewUploadedFile;
use intake_core::validation::{FileGate, FileRejection};
use intake_core::{LogLevel, Notice, Notifier, StorageKey, UserFacing};
use intake_db::{insert_row, InsertError, Table, TableWriter};
use intake_storage::{generate_object_key, ObjectStore, StorageError};

/// A file picked or dropped by the user
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    /// Media type declared by the picker, not sniffed from the bytes
    pub content_type: String,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Validating { file_name: String },
    Uploading { file_name: String, key: StorageKey },
    Succeeded { file_name: String, key: StorageKey },
    Failed { reason: String },
}

impl UploadState {
    /// True while the input control should be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            UploadState::Validating { .. } | UploadState::Uploading { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Rejected(#[from] FileRejection),

    #[error("Storage upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Metadata insert failed: {0}")]
    Metadata(#[from] InsertError),
}

impl UserFacing for UploadError {
    fn title(&self) -> &'static str {
        match self {
            UploadError::Rejected(rejection) => rejection.title(),
            _ => "Error",
        }
    }

    fn user_message(&self) -> String {
        match self {
            UploadError::Rejected(rejection) => rejection.user_message(),
            _ => "Failed to upload file. Please try again.".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Rejected(rejection) => rejection.log_level(),
            _ => LogLevel::Error,
        }
    }
}

pub struct UploadPipeline {
    store: Arc<dyn ObjectStore>,
    writer: Arc<dyn TableWriter>,
    notifier: Arc<dyn Notifier>,
    gate: FileGate,
    bucket: String,
    cleanup_orphans: bool,
    state: watch::Sender<UploadState>,
    selected: Option<String>,
}

impl UploadPipeline {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        writer: Arc<dyn TableWriter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        Self {
            store,
            writer,
            notifier,
            gate: FileGate::default(),
            bucket: DEFAULT_UPLOAD_BUCKET.to_string(),
            cleanup_orphans: true,
            state,
            selected: None,
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_cleanup_orphans(mut self, cleanup: bool) -> Self {
        self.cleanup_orphans = cleanup;
        self
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    /// Name of the file currently shown as selected, if any.
    pub fn selected_file(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Forget the selection and return to idle.
    pub fn reset(&mut self) {
        self.selected = None;
        self.set_state(UploadState::Idle);
    }

    fn set_state(&self, state: UploadState) {
        tracing::trace!(state = ?state, "Upload state changed");
        self.state.send_replace(state);
    }

    /// Run the pipeline for one selected file and return its storage key.
    ///
    /// Takes `&mut self`, so a pipeline never has two uploads in flight.
    #[tracing::instrument(skip(self, file), fields(file_name = %file.name, size = file.size()))]
    pub async fn handle_file(&mut self, file: CandidateFile) -> Result<StorageKey, UploadError> {
        self.set_state(UploadState::Validating {
            file_name: file.name.clone(),
        });

        if let Err(rejection) = self.gate.check(&file.content_type, file.size()) {
            let err = UploadError::from(rejection);
            self.selected = None;
            log_error(&err, "upload.validate");
            self.notifier.notify(Notice::from_error(&err));
            self.set_state(UploadState::Failed {
                reason: err.to_string(),
            });
            self.set_state(UploadState::Idle);
            return Err(err);
        }

        let key = generate_object_key(&file.name);
        self.selected = Some(file.name.clone());
        self.set_state(UploadState::Uploading {
            file_name: file.name.clone(),
            key: key.clone(),
        });

        let file_name = file.name.clone();
        match self.store_and_record(file, &key).await {
            Ok(()) => {
                tracing::info!(storage.key = %key, "File uploaded");
                self.set_state(UploadState::Succeeded {
                    file_name,
                    key: key.clone(),
                });
                self.notifier
                    .notify(Notice::info("Success", "File uploaded successfully"));
                Ok(key)
            }
            Err(err) => {
                self.selected = None;
                log_error(&err, "upload.store");
                self.notifier.notify(Notice::from_error(&err));
                self.set_state(UploadState::Failed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn store_and_record(
        &self,
        file: CandidateFile,
        key: &StorageKey,
    ) -> Result<(), UploadError> {
        let size = file.size();
        self.store
            .put(&self.bucket, key, &file.content_type, file.data)
            .await?;

        let row = NewUploadedFile {
            file_name: file.name,
            file_path: key.clone(),
            content_type: file.content_type,
            size: i64::try_from(size).unwrap_or(i64::MAX),
        };

        if let Err(err) = insert_row(self.writer.as_ref(), Table::Files, &row).await {
            if self.cleanup_orphans {
                self.remove_orphan(key).await;
            }
            return Err(err.into());
        }

        Ok(())
    }

    /// Best effort: a failed cleanup is logged and otherwise ignored.
    async fn remove_orphan(&self, key: &StorageKey) {
        match self.store.delete(&self.bucket, key).await {
            Ok(()) => tracing::info!(storage.key = %key, "Removed object without metadata row"),
            Err(e) => tracing::warn!(
                storage.key = %key,
                error = %e,
                "Failed to remove object without metadata row"
            ),
        }
    }
}
