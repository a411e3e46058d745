//! Front-end session: the router plus the completion notice shown after any
//! successful submission.

use std::sync::Arc;

use crate::router::{Completion, DocumentKind, EntryChoice, FormRouter, RouterError, Screen};
use intake_core::{Notice, Notifier};

pub struct FormSession {
    router: FormRouter,
    notifier: Arc<dyn Notifier>,
}

impl FormSession {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            router: FormRouter::new(),
            notifier,
        }
    }

    pub fn router(&self) -> &FormRouter {
        &self.router
    }

    pub fn screen(&self) -> Screen {
        self.router.screen()
    }

    pub fn selected_document(&self) -> Option<DocumentKind> {
        self.router.selected_document()
    }

    pub fn choose(&mut self, choice: EntryChoice) -> Result<Screen, RouterError> {
        self.router.choose(choice)
    }

    pub fn select_document(&mut self, kind: DocumentKind) -> Result<Screen, RouterError> {
        self.router.select_document(kind)
    }

    pub fn back(&mut self) -> Result<Screen, RouterError> {
        self.router.back()
    }
}

impl Completion for FormSession {
    fn submission_completed(&mut self) {
        self.notifier.notify(Notice::info(
            "Success!",
            "Your form has been submitted successfully.",
        ));
        self.router.complete();
    }
}
