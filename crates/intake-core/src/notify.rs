//! Notification capability
//!
//! Composers and the upload pipeline report outcomes through an injected
//! [`Notifier`] instead of a global toast channel. A GUI would render the notice,
//! the CLI prints it, and tests record it.

use std::sync::Mutex;

use crate::error::UserFacing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    /// Rendered as an error
    Destructive,
}

/// A short message for the person using the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Destructive,
        }
    }

    /// Destructive notice carrying the error's user-facing title and message.
    pub fn from_error<E: UserFacing + ?Sized>(err: &E) -> Self {
        Self::destructive(err.title(), err.user_message())
    }

    pub fn is_destructive(&self) -> bool {
        self.level == NoticeLevel::Destructive
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Logs notices; used when no UI is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => {
                tracing::info!(title = %notice.title, "{}", notice.description)
            }
            NoticeLevel::Destructive => {
                tracing::warn!(title = %notice.title, "{}", notice.description)
            }
        }
    }
}

/// Keeps every notice in order of arrival.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().ok().and_then(|n| n.last().cloned())
    }

    pub fn clear(&self) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogLevel;

    struct Taken;

    impl UserFacing for Taken {
        fn title(&self) -> &'static str {
            "Submission Failed"
        }

        fn user_message(&self) -> String {
            "already taken".to_string()
        }

        fn log_level(&self) -> LogLevel {
            LogLevel::Warn
        }
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::info("a", "first"));
        notifier.notify(Notice::destructive("b", "second"));

        let notices = notifier.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].description, "first");
        assert!(notifier.last().unwrap().is_destructive());

        notifier.clear();
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_notice_from_error_uses_user_message() {
        let notice = Notice::from_error(&Taken);
        assert_eq!(notice.title, "Submission Failed");
        assert_eq!(notice.description, "already taken");
        assert_eq!(notice.level, NoticeLevel::Destructive);
    }
}
