//! Error presentation
//!
//! Library errors stay as `thiserror` enums in their own crates. Each of them
//! implements [`UserFacing`] so a front-end can turn any failure into a notice
//! without matching on every variant.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a taken identifier
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be presented to the person filling a form
pub trait UserFacing {
    /// Short headline, e.g. "Invalid file type"
    fn title(&self) -> &'static str;

    /// Message shown under the title; may differ from the `Display` text
    fn user_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Emit a tracing event for `err` at the level it asks for.
pub fn log_error<E>(err: &E, operation: &'static str)
where
    E: UserFacing + std::fmt::Display,
{
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(operation, error = %err, "Operation rejected"),
        LogLevel::Warn => tracing::warn!(operation, error = %err, "Operation failed"),
        LogLevel::Error => tracing::error!(operation, error = %err, "Operation failed"),
    }
}
