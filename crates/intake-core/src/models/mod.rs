//! Rows written to the external store
//!
//! The store owns every entity; this crate only describes the payloads that are
//! composed and sent. Form models double as drafts and carry their validation
//! rules.

mod file;
mod registration;
mod submission;

pub use file::{NewUploadedFile, StorageKey};
pub use registration::RegistrationForm;
pub use submission::{
    BrandSubmissionForm, BrandSubmissionRow, BusinessSubmissionForm, Currency, PaymentDetails,
    PaymentMethod,
};
