//! Submission composers
//!
//! One composer per form. Each owns its draft, validates it, writes exactly one
//! row, and on success clears the draft and signals completion. On failure the
//! draft is kept so the user can fix it and retry.

mod brand;
mod business;
mod registration;

pub use brand::BrandComposer;
pub use business::BusinessComposer;
pub use registration::RegistrationComposer;

use intake_core::error::log_error;
use intake_core::{LogLevel, Notice, Notifier, UserFacing};
use intake_db::InsertError;
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Invalid form: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Unique ID already in use: {unique_id}")]
    DuplicateIdentifier { unique_id: String },

    #[error(transparent)]
    Insert(#[from] InsertError),
}

impl SubmitError {
    /// Names of the fields that failed validation, sorted.
    pub fn invalid_fields(&self) -> Vec<String> {
        match self {
            SubmitError::Invalid(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|field| field.to_string())
                    .collect();
                fields.sort();
                fields
            }
            _ => Vec::new(),
        }
    }
}

impl UserFacing for SubmitError {
    fn title(&self) -> &'static str {
        "Submission Failed"
    }

    fn user_message(&self) -> String {
        match self {
            SubmitError::Invalid(_) => format!(
                "Please check the following fields: {}",
                self.invalid_fields().join(", ")
            ),
            SubmitError::DuplicateIdentifier { .. } => {
                "This Unique ID is already in use. Please use a different one.".to_string()
            }
            SubmitError::Insert(_) => {
                "There was a problem submitting your form. Please try again.".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            SubmitError::Invalid(_) => LogLevel::Debug,
            SubmitError::DuplicateIdentifier { .. } => LogLevel::Warn,
            SubmitError::Insert(_) => LogLevel::Error,
        }
    }
}

fn report_failure(notifier: &dyn Notifier, err: &SubmitError, operation: &'static str) {
    log_error(err, operation);
    notifier.notify(Notice::from_error(err));
}
