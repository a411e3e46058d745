use std::sync::Arc;

use super::{report_failure, SubmitError};
use crate::router::Completion;
use crate::upload::{CandidateFile, UploadError, UploadPipeline};
use intake_core::models::BrandSubmissionForm;
use intake_core::{Notifier, StorageKey};
use intake_db::{insert_row, Table, TableWriter};

/// Brand-facing document composer (`lr_submissions`)
///
/// The optional spreadsheet goes through the shared [`UploadPipeline`]; its key
/// is copied into the draft and travels with the row.
pub struct BrandComposer {
    form: BrandSubmissionForm,
    writer: Arc<dyn TableWriter>,
    notifier: Arc<dyn Notifier>,
}

impl BrandComposer {
    pub fn new(writer: Arc<dyn TableWriter>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            form: BrandSubmissionForm::default(),
            writer,
            notifier,
        }
    }

    pub fn form(&self) -> &BrandSubmissionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BrandSubmissionForm {
        &mut self.form
    }

    /// Upload `file` and reference it from the draft. A failed upload leaves
    /// any previously attached key in place.
    pub async fn attach_upload(
        &mut self,
        pipeline: &mut UploadPipeline,
        file: CandidateFile,
    ) -> Result<StorageKey, UploadError> {
        let key = pipeline.handle_file(file).await?;
        self.form.file_path = Some(key.clone());
        Ok(key)
    }

    #[tracing::instrument(skip_all, fields(db.table = "lr_submissions"))]
    pub async fn submit(&mut self, completion: &mut dyn Completion) -> Result<(), SubmitError> {
        self.form.normalize();

        let result = async {
            let row = self.form.to_row()?;
            insert_row(self.writer.as_ref(), Table::BrandSubmissions, &row).await?;
            Ok::<(), SubmitError>(())
        }
        .await;

        if let Err(err) = result {
            report_failure(self.notifier.as_ref(), &err, "brand_submission.submit");
            return Err(err);
        }

        tracing::info!(
            has_file = self.form.file_path.is_some(),
            "Brand submission stored"
        );
        self.form = BrandSubmissionForm::default();
        completion.submission_completed();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::FormRouter;
    use crate::{DocumentKind, EntryChoice, Screen};
    use intake_core::models::{Currency, PaymentDetails};
    use intake_core::RecordingNotifier;
    use intake_db::{InsertError, MemoryTableWriter};
    use intake_storage::MemoryStorage;

    fn fill(form: &mut BrandSubmissionForm) {
        form.name = "Asha Rao".to_string();
        form.email = "asha@example.com".to_string();
        form.phone = "+91 98765 43210".to_string();
        form.brand_name = "Acme".to_string();
        form.note = "Listings on three marketplaces".to_string();
        form.currency = Some(Currency::Usd);
        form.payment = Some(PaymentDetails::BankTransfer {
            bank_name: "State Bank".to_string(),
            bank_account_number: "00112233".to_string(),
            ifsc_code: "SBIN0001234".to_string(),
        });
    }

    fn brand_router() -> FormRouter {
        let mut router = FormRouter::new();
        router.choose(EntryChoice::Submit).unwrap();
        router.select_document(DocumentKind::Brand).unwrap();
        router
    }

    #[tokio::test]
    async fn test_submit_with_attachment() {
        let store = Arc::new(MemoryStorage::new());
        let writer = Arc::new(MemoryTableWriter::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let mut pipeline = UploadPipeline::new(store.clone(), writer.clone(), notifier.clone());
        let mut composer = BrandComposer::new(writer.clone(), notifier.clone());
        let mut router = brand_router();

        fill(composer.form_mut());
        let key = composer
            .attach_upload(
                &mut pipeline,
                CandidateFile::new("links.csv", "text/csv", &b"url\nhttps://x.test\n"[..]),
            )
            .await
            .unwrap();
        assert_eq!(composer.form().file_path.as_ref(), Some(&key));

        composer.submit(&mut router).await.unwrap();

        let rows = writer.rows(Table::BrandSubmissions);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["file_path"], key.as_str());
        assert_eq!(rows[0]["payment_method"], "Bank Transfer");
        assert!(rows[0]["paypal_email"].is_null());
        assert_eq!(composer.form(), &BrandSubmissionForm::default());
        assert_eq!(router.screen(), Screen::Initial);
    }

    #[tokio::test]
    async fn test_rejected_attachment_keeps_draft_untouched() {
        let store = Arc::new(MemoryStorage::new());
        let writer = Arc::new(MemoryTableWriter::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let mut pipeline = UploadPipeline::new(store.clone(), writer.clone(), notifier.clone());
        let mut composer = BrandComposer::new(writer, notifier.clone());

        let err = composer
            .attach_upload(
                &mut pipeline,
                CandidateFile::new("scan.pdf", "application/pdf", &b"%PDF"[..]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Rejected(_)));
        assert_eq!(composer.form().file_path, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_blank_optionals_are_sent_as_null() {
        let writer = Arc::new(MemoryTableWriter::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let mut composer = BrandComposer::new(writer.clone(), notifier);
        let mut router = brand_router();

        fill(composer.form_mut());
        composer.form_mut().brand_website = Some("  ".to_string());
        composer.submit(&mut router).await.unwrap();

        let rows = writer.rows(Table::BrandSubmissions);
        assert!(rows[0]["brand_website"].is_null());
        assert!(rows[0]["file_path"].is_null());
    }

    #[tokio::test]
    async fn test_failure_keeps_draft_and_screen() {
        let writer = Arc::new(MemoryTableWriter::new());
        writer.fail_inserts(
            Table::BrandSubmissions,
            Some(InsertError::new("42501", "permission denied")),
        );
        let notifier = Arc::new(RecordingNotifier::new());
        let mut composer = BrandComposer::new(writer.clone(), notifier.clone());
        let mut router = brand_router();

        fill(composer.form_mut());
        let err = composer.submit(&mut router).await.unwrap_err();

        assert!(matches!(err, SubmitError::Insert(_)));
        assert_eq!(composer.form().brand_name, "Acme");
        assert_eq!(router.screen(), Screen::BrandDocument);

        let notice = notifier.last().unwrap();
        assert_eq!(notice.title, "Submission Failed");
        assert_eq!(
            notice.description,
            "There was a problem submitting your form. Please try again."
        );
    }

    #[tokio::test]
    async fn test_missing_payment_is_a_validation_error() {
        let writer = Arc::new(MemoryTableWriter::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let mut composer = BrandComposer::new(writer.clone(), notifier);
        let mut router = brand_router();

        fill(composer.form_mut());
        composer.form_mut().payment = None;

        let err = composer.submit(&mut router).await.unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["payment"]);
        assert_eq!(writer.count(Table::BrandSubmissions), 0);
    }
}
