//! Intake Core Library
//!
//! This crate provides the domain models, error metadata, configuration, validation
//! and notification capability shared by all Intake components.

pub mod backend_types;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod notify;
pub mod validation;

// Re-export commonly used types
pub use backend_types::{StorageBackend, TableBackend};
pub use config::IntakeConfig;
pub use error::{LogLevel, UserFacing};
pub use models::StorageKey;
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
// Note: ObjectStore and TableWriter live in intake-storage and intake-db
