//! Form flows: the attachment upload pipeline, the screen router and the
//! per-form submission composers.
//!
//! Everything here talks to the outside world through the `ObjectStore`,
//! `TableWriter` and `Notifier` seams, so the same flows run against the hosted
//! backend, a local setup, or the in-memory backends used in tests.

pub mod composer;
pub mod router;
pub mod session;
pub mod upload;

pub use composer::{BrandComposer, BusinessComposer, RegistrationComposer, SubmitError};
pub use router::{Completion, DocumentKind, EntryChoice, FormRouter, RouterError, Screen};
pub use session::FormSession;
pub use upload::{CandidateFile, UploadError, UploadPipeline, UploadState};
