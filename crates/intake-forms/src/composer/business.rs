use std::sync::Arc;
use validator::Validate;

use super::{report_failure, SubmitError};
use crate::router::Completion;
use intake_core::models::BusinessSubmissionForm;
use intake_core::{Notice, Notifier};
use intake_db::{insert_row, InsertError, Table, TableWriter};

/// Business-facing document composer (`rne_submissions`)
pub struct BusinessComposer {
    form: BusinessSubmissionForm,
    writer: Arc<dyn TableWriter>,
    notifier: Arc<dyn Notifier>,
}

impl BusinessComposer {
    pub fn new(writer: Arc<dyn TableWriter>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            form: BusinessSubmissionForm::default(),
            writer,
            notifier,
        }
    }

    pub fn form(&self) -> &BusinessSubmissionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BusinessSubmissionForm {
        &mut self.form
    }

    fn classify(&self, err: InsertError) -> SubmitError {
        if err.is_unique_violation() {
            SubmitError::DuplicateIdentifier {
                unique_id: self.form.unique_id.clone(),
            }
        } else {
            SubmitError::Insert(err)
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(db.table = "rne_submissions", unique_id = %self.form.unique_id)
    )]
    pub async fn submit(&mut self, completion: &mut dyn Completion) -> Result<(), SubmitError> {
        let result = match self.form.validate() {
            Err(errors) => Err(SubmitError::Invalid(errors)),
            Ok(()) => {
                let table = Table::BusinessSubmissions;
                insert_row(self.writer.as_ref(), table, &self.form)
                    .await
                    .map_err(|err| self.classify(err))
            }
        };

        if let Err(err) = result {
            report_failure(self.notifier.as_ref(), &err, "business_submission.submit");
            return Err(err);
        }

        tracing::info!("Business submission stored");
        self.notifier.notify(Notice::info(
            "Success!",
            "Your RnE form has been submitted successfully.",
        ));
        self.form = BusinessSubmissionForm::default();
        completion.submission_completed();
        Ok(())
    }
}
