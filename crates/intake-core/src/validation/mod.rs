//! Validation modules

pub mod fields;
pub mod file;

pub use fields::{validate_payment, validate_phone};
pub use file::{content_type_for_file_name, FileGate, FileRejection};
