//! Intake Storage Library
//!
//! Object storage abstraction for uploaded attachments. It includes the
//! [`ObjectStore`] trait, the object namer, and implementations for the hosted
//! storage API, the local filesystem and memory.
//!
//! # Storage key format
//!
//! Keys are `{uuid}.{extension}` where the UUID is a fresh v4 identifier and the
//! extension is taken from the original file name. Objects are addressed by
//! `(bucket, key)`. Key generation is centralized in the [`keys`] module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-remote")]
pub mod remote;
pub mod traits;

// Re-export commonly used types
pub use factory::create_object_store;
pub use intake_core::StorageBackend;
pub use keys::{file_extension, generate_object_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "storage-remote")]
pub use remote::RemoteStorage;
pub use traits::{ObjectStore, StorageError, StorageResult};
