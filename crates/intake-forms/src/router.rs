//! Screen router
//!
//! ```text
//! Initial ──register──▶ Registration
//!    │
//!    └──submit──▶ DocumentSelect ──brand────▶ BrandDocument
//!                              └──business──▶ BusinessDocument
//! ```
//!
//! `back` moves to the parent screen, except from the brand form, which returns
//! straight to `Initial`. `complete` returns to `Initial` from anywhere. The
//! selected document kind is part of the screen itself, so leaving a document
//! screen always clears it.

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Initial,
    Registration,
    DocumentSelect,
    /// Brand-facing document form (type A)
    BrandDocument,
    /// Business-facing document form (type B)
    BusinessDocument,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Initial => "initial",
            Screen::Registration => "registration",
            Screen::DocumentSelect => "document-select",
            Screen::BrandDocument => "brand-document",
            Screen::BusinessDocument => "business-document",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryChoice {
    Register,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Brand,
    Business,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("Cannot {action} from the {from} screen")]
    InvalidTransition { from: Screen, action: &'static str },
}

/// Called by a composer once its row was written.
pub trait Completion {
    fn submission_completed(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct FormRouter {
    screen: Screen,
}

impl FormRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_document(&self) -> Option<DocumentKind> {
        match self.screen {
            Screen::BrandDocument => Some(DocumentKind::Brand),
            Screen::BusinessDocument => Some(DocumentKind::Business),
            _ => None,
        }
    }

    fn go(&mut self, to: Screen) -> Screen {
        tracing::debug!(from = %self.screen, to = %to, "Screen change");
        self.screen = to;
        to
    }

    pub fn choose(&mut self, choice: EntryChoice) -> Result<Screen, RouterError> {
        if self.screen != Screen::Initial {
            return Err(RouterError::InvalidTransition {
                from: self.screen,
                action: "choose an entry",
            });
        }

        Ok(match choice {
            EntryChoice::Register => self.go(Screen::Registration),
            EntryChoice::Submit => self.go(Screen::DocumentSelect),
        })
    }

    pub fn select_document(&mut self, kind: DocumentKind) -> Result<Screen, RouterError> {
        if self.screen != Screen::DocumentSelect {
            return Err(RouterError::InvalidTransition {
                from: self.screen,
                action: "select a document type",
            });
        }

        Ok(match kind {
            DocumentKind::Brand => self.go(Screen::BrandDocument),
            DocumentKind::Business => self.go(Screen::BusinessDocument),
        })
    }

    pub fn back(&mut self) -> Result<Screen, RouterError> {
        let parent = match self.screen {
            Screen::Initial => {
                return Err(RouterError::InvalidTransition {
                    from: Screen::Initial,
                    action: "go back",
                })
            }
            Screen::BusinessDocument => Screen::DocumentSelect,
            Screen::Registration | Screen::DocumentSelect => Screen::Initial,
            Screen::BrandDocument => Screen::Initial,
        };
        Ok(self.go(parent))
    }

    /// Unconditional reset after a successful submission.
    pub fn complete(&mut self) {
        self.go(Screen::Initial);
    }
}

impl Completion for FormRouter {
    fn submission_completed(&mut self) {
        self.complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_initial() {
        let router = FormRouter::new();
        assert_eq!(router.screen(), Screen::Initial);
        assert_eq!(router.selected_document(), None);
    }

    #[test]
    fn test_submit_business_then_back_returns_to_document_select() {
        let mut router = FormRouter::new();
        assert_eq!(
            router.choose(EntryChoice::Submit).unwrap(),
            Screen::DocumentSelect
        );
        assert_eq!(
            router.select_document(DocumentKind::Business).unwrap(),
            Screen::BusinessDocument
        );
        assert_eq!(router.selected_document(), Some(DocumentKind::Business));

        assert_eq!(router.back().unwrap(), Screen::DocumentSelect);
        assert_eq!(router.selected_document(), None);
    }

    #[test]
    fn test_brand_back_returns_to_initial() {
        let mut router = FormRouter::new();
        router.choose(EntryChoice::Submit).unwrap();
        router.select_document(DocumentKind::Brand).unwrap();

        assert_eq!(router.back().unwrap(), Screen::Initial);
        assert_eq!(router.selected_document(), None);
        assert!(router.back().is_err());
    }

    #[test]
    fn test_registration_back_returns_to_initial() {
        let mut router = FormRouter::new();
        router.choose(EntryChoice::Register).unwrap();
        assert_eq!(router.screen(), Screen::Registration);
        assert_eq!(router.back().unwrap(), Screen::Initial);
    }

    #[test]
    fn test_invalid_transitions_leave_state_alone() {
        let mut router = FormRouter::new();
        assert!(router.back().is_err());
        assert!(router.select_document(DocumentKind::Brand).is_err());

        router.choose(EntryChoice::Register).unwrap();
        let err = router.choose(EntryChoice::Submit).unwrap_err();
        assert_eq!(
            err,
            RouterError::InvalidTransition {
                from: Screen::Registration,
                action: "choose an entry",
            }
        );
        assert_eq!(router.screen(), Screen::Registration);
    }

    #[test]
    fn test_completion_resets_from_any_leaf() {
        for kind in [DocumentKind::Brand, DocumentKind::Business] {
            let mut router = FormRouter::new();
            router.choose(EntryChoice::Submit).unwrap();
            router.select_document(kind).unwrap();
            router.submission_completed();
            assert_eq!(router.screen(), Screen::Initial);
            assert_eq!(router.selected_document(), None);
        }

        let mut router = FormRouter::new();
        router.choose(EntryChoice::Register).unwrap();
        router.complete();
        assert_eq!(router.screen(), Screen::Initial);
    }

    #[test]
    fn test_error_message_names_screen() {
        let err = FormRouter::new().back().unwrap_err();
        assert_eq!(err.to_string(), "Cannot go back from the initial screen");
    }
}
