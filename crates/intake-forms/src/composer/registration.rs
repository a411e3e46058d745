use std::sync::Arc;
use validator::Validate;

use super::{report_failure, SubmitError};
use crate::router::Completion;
use intake_core::models::RegistrationForm;
use intake_core::Notifier;
use intake_db::{insert_row, Table, TableWriter};

/// Registration form composer (`rne_registrations`)
pub struct RegistrationComposer {
    form: RegistrationForm,
    writer: Arc<dyn TableWriter>,
    notifier: Arc<dyn Notifier>,
}

impl RegistrationComposer {
    pub fn new(writer: Arc<dyn TableWriter>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            form: RegistrationForm::default(),
            writer,
            notifier,
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    #[tracing::instrument(skip_all, fields(db.table = "rne_registrations"))]
    pub async fn submit(&mut self, completion: &mut dyn Completion) -> Result<(), SubmitError> {
        let result = async {
            self.form.validate()?;
            insert_row(self.writer.as_ref(), Table::Registrations, &self.form).await?;
            Ok::<(), SubmitError>(())
        }
        .await;

        if let Err(err) = result {
            report_failure(self.notifier.as_ref(), &err, "registration.submit");
            return Err(err);
        }

        tracing::info!("Registration submitted");
        self.form = RegistrationForm::default();
        completion.submission_completed();
        Ok(())
    }
}
