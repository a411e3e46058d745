//! Intake CLI: upload spreadsheets and submit the intake forms from a terminal.
//!
//! Backends are chosen from the environment (see `IntakeConfig`). A `.env` file
//! in the working directory is loaded first.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

use intake_cli::interactive::{self, Prompter};
use intake_cli::{init_tracing, read_candidate, select_notifier, Backends};
use intake_core::constants::{
    BRAND_SUBMISSIONS_TABLE, BUSINESS_SUBMISSIONS_TABLE, REGISTRATIONS_TABLE,
};
use intake_core::models::{BrandSubmissionForm, BusinessSubmissionForm, PaymentDetails};
use intake_core::IntakeConfig;
use intake_forms::{
    BrandComposer, BusinessComposer, DocumentKind, EntryChoice, FormSession,
    RegistrationComposer,
};

#[derive(Parser)]
#[command(name = "intake", about = "Intake forms client")]
struct Cli {
    /// Send notices to the log instead of printing them
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a spreadsheet (.xls, .xlsx or .csv, at most 10MB)
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Media type to declare instead of guessing from the extension
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Submit the registration form
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        /// LinkedIn profile URL
        #[arg(long)]
        linkedin: String,
    },
    /// Submit a document form
    Submit {
        #[command(subcommand)]
        document: SubmitCommands,
    },
    /// Walk through the forms interactively
    Interactive,
}

#[derive(Subcommand)]
enum SubmitCommands {
    /// Brand-facing document, optionally with an attached spreadsheet
    Brand(Box<BrandArgs>),
    /// Business-facing document
    Business(BusinessArgs),
}

#[derive(Args)]
struct BrandArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    brand_name: String,
    #[arg(long)]
    brand_website: Option<String>,
    #[arg(long)]
    contact_name: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
    #[arg(long)]
    contact_designation: Option<String>,
    #[arg(long)]
    note: String,
    #[arg(long)]
    country: Option<String>,
    /// USD, INR, GBP or AUD
    #[arg(long)]
    currency: String,
    /// Pay out via PayPal to this address
    #[arg(long, conflicts_with_all = ["bank_name", "bank_account_number", "ifsc_code"])]
    paypal_email: Option<String>,
    /// Pay out via bank transfer
    #[arg(long)]
    bank_name: Option<String>,
    #[arg(long)]
    bank_account_number: Option<String>,
    #[arg(long)]
    ifsc_code: Option<String>,
    /// Spreadsheet to upload and attach
    #[arg(long)]
    file: Option<PathBuf>,
}

impl BrandArgs {
    /// The draft these flags describe, plus the file to attach.
    fn into_form(self) -> anyhow::Result<(BrandSubmissionForm, Option<PathBuf>)> {
        let payment = self.payment();
        let form = BrandSubmissionForm {
            name: self.name,
            email: self.email,
            phone: self.phone,
            brand_name: self.brand_name,
            brand_website: self.brand_website,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            contact_designation: self.contact_designation,
            note: self.note,
            country: self.country,
            currency: Some(self.currency.parse()?),
            payment,
            file_path: None,
        };
        Ok((form, self.file))
    }

    fn payment(&self) -> Option<PaymentDetails> {
        if let Some(paypal_email) = &self.paypal_email {
            return Some(PaymentDetails::PayPal {
                paypal_email: paypal_email.clone(),
            });
        }
        if self.bank_name.is_none()
            && self.bank_account_number.is_none()
            && self.ifsc_code.is_none()
        {
            return None;
        }
        Some(PaymentDetails::BankTransfer {
            bank_name: self.bank_name.clone().unwrap_or_default(),
            bank_account_number: self.bank_account_number.clone().unwrap_or_default(),
            ifsc_code: self.ifsc_code.clone().unwrap_or_default(),
        })
    }
}

#[derive(Args)]
struct BusinessArgs {
    /// Identifier that must not have been used before
    #[arg(long)]
    unique_id: String,
    #[arg(long)]
    business_name: String,
    #[arg(long)]
    business_website: String,
    #[arg(long)]
    contact_name: String,
    #[arg(long)]
    contact_email: String,
    #[arg(long)]
    contact_designation: String,
    #[arg(long)]
    note: String,
}

impl From<BusinessArgs> for BusinessSubmissionForm {
    fn from(args: BusinessArgs) -> Self {
        BusinessSubmissionForm {
            unique_id: args.unique_id,
            business_name: args.business_name,
            business_website: args.business_website,
            contact_name: args.contact_name,
            contact_email: args.contact_email,
            contact_designation: args.contact_designation,
            note: args.note,
        }
    }
}

#[derive(Serialize)]
struct Submitted {
    table: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_path: Option<String>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = IntakeConfig::from_env().context("Failed to load configuration")?;
    let backends = Backends::from_config(&config).await?;
    let notifier = select_notifier(cli.quiet);
    let writer = backends.writer.clone();

    match cli.command {
        Commands::Upload { file, content_type } => {
            let candidate = read_candidate(&file, content_type.as_deref()).await?;
            let file_name = candidate.name.clone();
            let mut pipeline = backends.pipeline(notifier.clone());
            let key = pipeline.handle_file(candidate).await?;
            print_json(&serde_json::json!({
                "file_name": file_name,
                "file_path": key,
                "bucket": backends.bucket,
            }))?;
        }
        Commands::Register {
            name,
            email,
            phone,
            linkedin,
        } => {
            let mut session = FormSession::new(notifier.clone());
            session.choose(EntryChoice::Register)?;

            let mut composer = RegistrationComposer::new(writer, notifier.clone());
            let form = composer.form_mut();
            form.name = name;
            form.email = email;
            form.phone = phone;
            form.linkedin = linkedin;

            composer.submit(&mut session).await?;
            print_json(&Submitted {
                table: REGISTRATIONS_TABLE,
                file_path: None,
            })?;
        }
        Commands::Submit {
            document: SubmitCommands::Brand(args),
        } => {
            let (form, file) = args.into_form()?;

            let mut session = FormSession::new(notifier.clone());
            session.choose(EntryChoice::Submit)?;
            session.select_document(DocumentKind::Brand)?;

            let mut composer = BrandComposer::new(writer, notifier.clone());
            *composer.form_mut() = form;

            if let Some(path) = file {
                let candidate = read_candidate(&path, None).await?;
                let mut pipeline = backends.pipeline(notifier.clone());
                composer.attach_upload(&mut pipeline, candidate).await?;
            }
            let file_path = composer.form().file_path.as_ref().map(|k| k.to_string());

            composer.submit(&mut session).await?;
            print_json(&Submitted {
                table: BRAND_SUBMISSIONS_TABLE,
                file_path,
            })?;
        }
        Commands::Submit {
            document: SubmitCommands::Business(args),
        } => {
            let mut session = FormSession::new(notifier.clone());
            session.choose(EntryChoice::Submit)?;
            session.select_document(DocumentKind::Business)?;

            let mut composer = BusinessComposer::new(writer, notifier.clone());
            *composer.form_mut() = args.into();

            composer.submit(&mut session).await?;
            print_json(&Submitted {
                table: BUSINESS_SUBMISSIONS_TABLE,
                file_path: None,
            })?;
        }
        Commands::Interactive => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            interactive::run(&backends, notifier, &mut prompter).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::models::Currency;

    const BRAND: [&str; 15] = [
        "intake",
        "submit",
        "brand",
        "--name",
        "Asha Rao",
        "--email",
        "asha@example.com",
        "--phone",
        "+91 98765 43210",
        "--brand-name",
        "Acme",
        "--note",
        "Listings",
        "--currency",
        "gbp",
    ];

    fn brand_args(extra: &[&str]) -> BrandArgs {
        let argv = BRAND.iter().chain(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Submit {
                document: SubmitCommands::Brand(args),
            } => *args,
            _ => panic!("expected a brand submission"),
        }
    }

    #[test]
    fn test_brand_flags_build_paypal_form() {
        let args = brand_args(&["--paypal-email", "pay@acme.example", "--file", "a.csv"]);
        let (form, file) = args.into_form().unwrap();

        assert_eq!(form.brand_name, "Acme");
        assert_eq!(form.currency, Some(Currency::Gbp));
        assert_eq!(
            form.payment,
            Some(PaymentDetails::PayPal {
                paypal_email: "pay@acme.example".to_string(),
            })
        );
        assert_eq!(file, Some(PathBuf::from("a.csv")));
    }

    #[test]
    fn test_brand_flags_build_bank_form() {
        let args = brand_args(&["--bank-name", "State Bank", "--ifsc-code", "SBIN0001234"]);
        let (form, file) = args.into_form().unwrap();

        assert_eq!(
            form.payment,
            Some(PaymentDetails::BankTransfer {
                bank_name: "State Bank".to_string(),
                bank_account_number: String::new(),
                ifsc_code: "SBIN0001234".to_string(),
            })
        );
        assert_eq!(file, None);
    }

    #[test]
    fn test_paypal_conflicts_with_bank_flags() {
        let extra = ["--paypal-email", "p@x.io", "--bank-name", "SBI"];
        let argv = BRAND.iter().chain(&extra);
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_unknown_currency_is_an_error() {
        let mut args = brand_args(&[]);
        args.currency = "EUR".to_string();
        assert!(args.into_form().is_err());
    }

    #[test]
    fn test_business_flags_and_global_quiet() {
        let cli = Cli::try_parse_from([
            "intake",
            "submit",
            "business",
            "--unique-id",
            "ABC-1",
            "--business-name",
            "Acme Retail",
            "--business-website",
            "https://acme.example",
            "--contact-name",
            "Ravi",
            "--contact-email",
            "ravi@acme.example",
            "--contact-designation",
            "Head of Legal",
            "--note",
            "Reseller",
            "--quiet",
        ])
        .unwrap();

        assert!(cli.quiet);
        match cli.command {
            Commands::Submit {
                document: SubmitCommands::Business(args),
            } => {
                let form = BusinessSubmissionForm::from(args);
                assert_eq!(form.unique_id, "ABC-1");
                assert_eq!(form.contact_designation, "Head of Legal");
            }
            _ => panic!("expected a business submission"),
        }
    }
}
