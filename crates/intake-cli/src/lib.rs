//! Shared plumbing for the `intake` binary: tracing setup, console notices,
//! backend wiring and the interactive walk through the forms.

pub mod interactive;

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

use intake_core::validation::content_type_for_file_name;
use intake_core::{IntakeConfig, Notice, NoticeLevel, Notifier, TracingNotifier};
use intake_db::{create_table_writer, TableWriter};
use intake_forms::{CandidateFile, UploadPipeline};
use intake_storage::{create_object_store, ObjectStore};

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays parseable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Prints notices to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn render(notice: &Notice) -> String {
        let tag = match notice.level {
            NoticeLevel::Info => "ok",
            NoticeLevel::Destructive => "error",
        };
        format!("[{}] {}: {}", tag, notice.title, notice.description)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", Self::render(&notice));
    }
}

/// Console notices, or log records only when `quiet` is set.
pub fn select_notifier(quiet: bool) -> Arc<dyn Notifier> {
    if quiet {
        Arc::new(TracingNotifier)
    } else {
        Arc::new(ConsoleNotifier)
    }
}

/// The configured object store and table writer
#[derive(Clone)]
pub struct Backends {
    pub store: Arc<dyn ObjectStore>,
    pub writer: Arc<dyn TableWriter>,
    pub bucket: String,
    pub cleanup_orphans: bool,
}

impl Backends {
    pub async fn from_config(config: &IntakeConfig) -> anyhow::Result<Self> {
        config.validate().context("Invalid configuration")?;

        let store = create_object_store(config)
            .await
            .context("Failed to create object store")?;
        let writer = create_table_writer(config)
            .await
            .context("Failed to create table writer")?;

        tracing::info!(
            storage_backend = %store.backend_type(),
            table_backend = %writer.backend_type(),
            bucket = %config.upload_bucket,
            "Backends ready"
        );

        Ok(Self {
            store,
            writer,
            bucket: config.upload_bucket.clone(),
            cleanup_orphans: config.cleanup_orphaned_objects,
        })
    }

    pub fn pipeline(&self, notifier: Arc<dyn Notifier>) -> UploadPipeline {
        UploadPipeline::new(self.store.clone(), self.writer.clone(), notifier)
            .with_bucket(self.bucket.clone())
            .with_cleanup_orphans(self.cleanup_orphans)
    }
}

/// Read a file from disk. Without an explicit type, the media type is
/// guessed from the extension.
pub async fn read_candidate(
    path: &Path,
    content_type: Option<&str>,
) -> anyhow::Result<CandidateFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = content_type
        .map(str::to_string)
        .unwrap_or_else(|| content_type_for_file_name(&name).to_string());

    Ok(CandidateFile::new(name, content_type, data))
}
