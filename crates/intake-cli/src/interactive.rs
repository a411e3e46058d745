//! Line-oriented walk through the form screens.
//!
//! Each screen prompts for its fields; an empty answer keeps the value already
//! in the draft, so a failed submission can be corrected without retyping
//! everything. A `-` answer clears an optional field. End of input leaves the
//! walk quietly.

use anyhow::Context;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use crate::{read_candidate, Backends};
use intake_core::models::{
    BrandSubmissionForm, BusinessSubmissionForm, Currency, PaymentDetails, RegistrationForm,
};
use intake_core::Notifier;
use intake_forms::{
    BrandComposer, BusinessComposer, DocumentKind, EntryChoice, FormSession,
    RegistrationComposer, Screen, UploadPipeline,
};

/// Answer that empties an optional field
const CLEAR: &str = "-";

#[derive(Debug, thiserror::Error)]
#[error("end of input")]
struct EndOfInput;

enum Action {
    Submit,
    Back,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn line(&mut self) -> anyhow::Result<String> {
        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .context("Failed to read input")?;
        if read == 0 {
            return Err(EndOfInput.into());
        }
        Ok(buf.trim().to_string())
    }

    fn say(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn choice(&mut self, menu: &str) -> anyhow::Result<String> {
        write!(self.output, "{}\n> ", menu)?;
        self.output.flush()?;
        self.line()
    }

    /// Ask for a value; an empty answer keeps `current`.
    fn field(&mut self, label: &str, current: &str) -> anyhow::Result<String> {
        if current.is_empty() {
            write!(self.output, "{}: ", label)?;
        } else {
            write!(self.output, "{} [{}]: ", label, current)?;
        }
        self.output.flush()?;

        let answer = self.line()?;
        Ok(if answer.is_empty() {
            current.to_string()
        } else {
            answer
        })
    }

    /// Like [`Self::field`], but `-` clears the value.
    fn optional_field(
        &mut self,
        label: &str,
        current: &Option<String>,
    ) -> anyhow::Result<Option<String>> {
        let label = format!("{} (optional, {} clears)", label, CLEAR);
        let answer = self.field(&label, current.as_deref().unwrap_or(""))?;
        Ok(match answer.as_str() {
            "" | CLEAR => None,
            _ => Some(answer),
        })
    }

    fn action(&mut self) -> anyhow::Result<Action> {
        loop {
            match self.choice("s) Submit  b) Back")?.as_str() {
                "s" => return Ok(Action::Submit),
                "b" => return Ok(Action::Back),
                other => self.say(&format!("Unknown choice: {}", other))?,
            }
        }
    }
}

/// Run the walk until the user quits or input ends.
pub async fn run<R: BufRead, W: Write>(
    backends: &Backends,
    notifier: Arc<dyn Notifier>,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    match walk(backends, notifier, prompter).await {
        Err(err) if err.is::<EndOfInput>() => Ok(()),
        other => other,
    }
}

async fn walk<R: BufRead, W: Write>(
    backends: &Backends,
    notifier: Arc<dyn Notifier>,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()> {
    let mut session = FormSession::new(notifier.clone());
    let mut pipeline = backends.pipeline(notifier.clone());
    let mut registration = RegistrationComposer::new(backends.writer.clone(), notifier.clone());
    let mut brand = BrandComposer::new(backends.writer.clone(), notifier.clone());
    let mut business = BusinessComposer::new(backends.writer.clone(), notifier);

    loop {
        match session.screen() {
            Screen::Initial => {
                match prompter
                    .choice("1) Register  2) Submit a document  q) Quit")?
                    .as_str()
                {
                    "1" => {
                        session.choose(EntryChoice::Register)?;
                    }
                    "2" => {
                        session.choose(EntryChoice::Submit)?;
                    }
                    "q" => return Ok(()),
                    other => prompter.say(&format!("Unknown choice: {}", other))?,
                }
            }
            Screen::DocumentSelect => {
                match prompter
                    .choice("1) Brand document  2) Business document  b) Back")?
                    .as_str()
                {
                    "1" => {
                        session.select_document(DocumentKind::Brand)?;
                    }
                    "2" => {
                        session.select_document(DocumentKind::Business)?;
                    }
                    "b" => {
                        session.back()?;
                    }
                    other => prompter.say(&format!("Unknown choice: {}", other))?,
                }
            }
            Screen::Registration => {
                fill_registration(prompter, registration.form_mut())?;
                match prompter.action()? {
                    Action::Submit => {
                        if registration.submit(&mut session).await.is_err() {
                            prompter.say("Correct the fields and submit again.")?;
                        }
                    }
                    Action::Back => {
                        *registration.form_mut() = RegistrationForm::default();
                        session.back()?;
                    }
                }
            }
            Screen::BrandDocument => {
                fill_brand(prompter, brand.form_mut())?;
                attach_file(prompter, &mut brand, &mut pipeline).await?;
                match prompter.action()? {
                    Action::Submit => {
                        if brand.submit(&mut session).await.is_err() {
                            prompter.say("Correct the fields and submit again.")?;
                        }
                    }
                    Action::Back => {
                        *brand.form_mut() = BrandSubmissionForm::default();
                        pipeline.reset();
                        session.back()?;
                    }
                }
            }
            Screen::BusinessDocument => {
                fill_business(prompter, business.form_mut())?;
                match prompter.action()? {
                    Action::Submit => {
                        if business.submit(&mut session).await.is_err() {
                            prompter.say("Correct the fields and submit again.")?;
                        }
                    }
                    Action::Back => {
                        *business.form_mut() = BusinessSubmissionForm::default();
                        session.back()?;
                    }
                }
            }
        }
    }
}

fn fill_registration<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    form: &mut RegistrationForm,
) -> anyhow::Result<()> {
    form.name = p.field("Name", &form.name)?;
    form.email = p.field("Email", &form.email)?;
    form.phone = p.field("Phone", &form.phone)?;
    form.linkedin = p.field("LinkedIn profile URL", &form.linkedin)?;
    Ok(())
}

fn fill_business<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    form: &mut BusinessSubmissionForm,
) -> anyhow::Result<()> {
    form.unique_id = p.field("Unique ID", &form.unique_id)?;
    form.business_name = p.field("Business name", &form.business_name)?;
    form.business_website = p.field("Business website", &form.business_website)?;
    form.contact_name = p.field("Contact person name", &form.contact_name)?;
    form.contact_email = p.field("Contact person email", &form.contact_email)?;
    form.contact_designation = p.field("Contact person designation", &form.contact_designation)?;
    form.note = p.field("Note", &form.note)?;
    Ok(())
}

fn fill_brand<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    form: &mut BrandSubmissionForm,
) -> anyhow::Result<()> {
    form.name = p.field("Your name", &form.name)?;
    form.email = p.field("Your email", &form.email)?;
    form.phone = p.field("Phone", &form.phone)?;
    form.brand_name = p.field("Brand name", &form.brand_name)?;
    form.brand_website = p.optional_field("Brand website", &form.brand_website)?;
    form.contact_name = p.optional_field("Contact name", &form.contact_name)?;
    form.contact_email = p.optional_field("Contact email", &form.contact_email)?;
    form.contact_designation = p.optional_field("Contact designation", &form.contact_designation)?;
    form.note = p.field("Note", &form.note)?;
    form.country = p.optional_field("Country", &form.country)?;

    loop {
        let current = form.currency.map(Currency::code).unwrap_or("");
        let answer = p.field("Currency (USD, INR, GBP, AUD)", current)?;
        match answer.parse::<Currency>() {
            Ok(currency) => {
                form.currency = Some(currency);
                break;
            }
            Err(e) => p.say(&e.to_string())?,
        }
    }

    loop {
        let current = form
            .payment
            .as_ref()
            .map(|payment| payment.method().label())
            .unwrap_or("");
        let answer = p.field("Payment method (1 = Bank Transfer, 2 = PayPal)", current)?;
        let payment = match answer.as_str() {
            "1" | "Bank Transfer" => {
                let (bank, account, ifsc) = match &form.payment {
                    Some(PaymentDetails::BankTransfer {
                        bank_name: bank,
                        bank_account_number: account,
                        ifsc_code: ifsc,
                    }) => (bank.as_str(), account.as_str(), ifsc.as_str()),
                    _ => ("", "", ""),
                };
                PaymentDetails::BankTransfer {
                    bank_name: p.field("Bank name", bank)?,
                    bank_account_number: p.field("Account number", account)?,
                    ifsc_code: p.field("IFSC code", ifsc)?,
                }
            }
            "2" | "PayPal" => {
                let email = match &form.payment {
                    Some(PaymentDetails::PayPal { paypal_email }) => paypal_email.as_str(),
                    _ => "",
                };
                PaymentDetails::PayPal {
                    paypal_email: p.field("PayPal email", email)?,
                }
            }
            other => {
                p.say(&format!("Unknown payment method: {}", other))?;
                continue;
            }
        };
        form.payment = Some(payment);
        return Ok(());
    }
}

async fn attach_file<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    brand: &mut BrandComposer,
    pipeline: &mut UploadPipeline,
) -> anyhow::Result<()> {
    let current = brand
        .form()
        .file_path
        .as_ref()
        .map(|key| key.to_string())
        .unwrap_or_default();
    let answer = p.field("Spreadsheet to attach (optional path)", "")?;
    if answer.is_empty() {
        if !current.is_empty() {
            p.say(&format!("Keeping attached file {}", current))?;
        }
        return Ok(());
    }

    match read_candidate(Path::new(&answer), None).await {
        Ok(file) => {
            if let Ok(key) = brand.attach_upload(pipeline, file).await {
                p.say(&format!("Attached as {}", key))?;
            }
        }
        Err(e) => p.say(&format!("{:#}", e))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::RecordingNotifier;
    use intake_db::{MemoryTableWriter, Table};
    use intake_storage::MemoryStorage;

    fn backends(writer: Arc<MemoryTableWriter>) -> Backends {
        Backends {
            store: Arc::new(MemoryStorage::new()),
            writer,
            bucket: "lr_files".to_string(),
            cleanup_orphans: true,
        }
    }

    async fn drive(
        script: &str,
        writer: Arc<MemoryTableWriter>,
    ) -> (String, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut output = Vec::new();
        {
            let mut prompter = Prompter::new(script.as_bytes(), &mut output);
            run(&backends(writer), notifier.clone(), &mut prompter)
                .await
                .unwrap();
        }
        (String::from_utf8(output).unwrap(), notifier)
    }

    #[tokio::test]
    async fn test_business_submission_then_quit() {
        let writer = Arc::new(MemoryTableWriter::new());
        let script = concat!(
            "2\n2\n",
            "ABC-1\nAcme Retail\nhttps://acme.example\nRavi\nravi@acme.example\nCEO\nReseller\n",
            "s\nq\n",
        );

        let (_, notifier) = drive(script, writer.clone()).await;

        let rows = writer.rows(Table::BusinessSubmissions);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["unique_id"], "ABC-1");
        assert_eq!(notifier.last().unwrap().title, "Success!");
    }

    #[tokio::test]
    async fn test_failed_registration_keeps_answers() {
        let writer = Arc::new(MemoryTableWriter::new());
        // second pass only fixes the phone number
        let script = concat!(
            "1\nAsha\nasha@example.com\n12\nhttps://linkedin.com/in/asha\ns\n",
            "\n\n+91 98765 43210\n\ns\nq\n",
        );

        let (output, notifier) = drive(script, writer.clone()).await;

        assert_eq!(writer.count(Table::Registrations), 1);
        assert_eq!(writer.rows(Table::Registrations)[0]["name"], "Asha");
        assert!(output.contains("Name [Asha]: "));
        assert!(notifier.notices()[0].is_destructive());
    }

    #[tokio::test]
    async fn test_brand_paypal_submission() {
        let writer = Arc::new(MemoryTableWriter::new());
        let script = concat!(
            "2\n1\n",
            "Asha\nasha@example.com\n+91 98765 43210\nAcme\n\n\n\n\nFakes listed\nIndia\n",
            "eur\ninr\n",
            "2\npay@acme.example\n",
            "\n",
            "s\nq\n",
        );

        let (output, _) = drive(script, writer.clone()).await;

        assert!(output.contains("Unsupported currency: eur"));
        let rows = writer.rows(Table::BrandSubmissions);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["currency"], "INR");
        assert_eq!(rows[0]["paypal_email"], "pay@acme.example");
        assert!(rows[0]["brand_website"].is_null());
        assert_eq!(rows[0]["country"], "India");
    }

    #[tokio::test]
    async fn test_dash_clears_optional_answer() {
        let writer = Arc::new(MemoryTableWriter::new());
        // the website fails validation, the second pass clears it
        let script = concat!(
            "2\n1\n",
            "Asha\nasha@example.com\n+91 98765 43210\nAcme\nnot a url\n\n\n\nFakes listed\n\n",
            "usd\n2\npay@acme.example\n\ns\n",
            "\n\n\n\n-\n\n\n\n\n\n\n\n\n\ns\nq\n",
        );

        let (output, notifier) = drive(script, writer.clone()).await;

        assert!(output.contains("Brand website (optional, - clears) [not a url]: "));
        assert!(notifier.notices()[0].is_destructive());
        let rows = writer.rows(Table::BrandSubmissions);
        assert_eq!(rows.len(), 1);
        assert!(rows[0]["brand_website"].is_null());
        assert_eq!(rows[0]["currency"], "USD");
    }

    #[tokio::test]
    async fn test_brand_back_returns_to_entry_menu() {
        let writer = Arc::new(MemoryTableWriter::new());
        let script = concat!(
            "2\n1\n",
            "Asha\n\n\n\n\n\n\n\n\n\n",
            "usd\n2\npay@acme.example\n\nb\n",
            "q\n",
        );

        let (output, _) = drive(script, writer.clone()).await;

        assert_eq!(writer.count(Table::BrandSubmissions), 0);
        let after_back = output.rsplit("b) Back\n> ").next().unwrap();
        assert!(after_back.starts_with("1) Register  2) Submit a document  q) Quit\n> "));
    }

    #[tokio::test]
    async fn test_back_discards_draft_and_eof_exits() {
        let writer = Arc::new(MemoryTableWriter::new());
        let script = "2\n2\nXYZ\n\n\n\n\n\n\nb\nb\n";

        let (output, _) = drive(script, writer.clone()).await;

        assert_eq!(writer.count(Table::BusinessSubmissions), 0);
        assert!(output.ends_with("1) Register  2) Submit a document  q) Quit\n> "));
    }
}
