use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

use super::file::StorageKey;
use crate::validation::{validate_payment, validate_phone};

/// Payout currency offered on the brand form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "AUD")]
    Aud,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Inr, Currency::Gbp, Currency::Aud];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
            Currency::Gbp => "GBP",
            Currency::Aud => "AUD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unsupported currency: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "PayPal")]
    PayPal,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::PayPal => "PayPal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payout details; only the chosen method's fields exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentDetails {
    BankTransfer {
        bank_name: String,
        bank_account_number: String,
        ifsc_code: String,
    },
    #[serde(rename = "paypal")]
    PayPal { paypal_email: String },
}

impl PaymentDetails {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentDetails::BankTransfer { .. } => PaymentMethod::BankTransfer,
            PaymentDetails::PayPal { .. } => PaymentMethod::PayPal,
        }
    }
}

/// Brand-facing document submission draft (document type A)
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct BrandSubmissionForm {
    #[validate(length(min = 1, message = "Your name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Brand name is required"))]
    pub brand_name: String,
    #[validate(url(message = "Enter a valid brand website"))]
    pub brand_website: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email(message = "Enter a valid contact email"))]
    pub contact_email: Option<String>,
    pub contact_designation: Option<String>,
    #[validate(length(min = 1, message = "A note is required"))]
    pub note: String,
    pub country: Option<String>,
    #[validate(required(message = "Select a currency"))]
    pub currency: Option<Currency>,
    #[validate(
        required(message = "Select a payment method"),
        custom(function = "validate_payment")
    )]
    pub payment: Option<PaymentDetails>,
    /// Key of an uploaded spreadsheet, set by the upload pipeline
    pub file_path: Option<StorageKey>,
}

/// Insert payload for `lr_submissions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandSubmissionRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub brand_name: String,
    pub brand_website: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_designation: Option<String>,
    pub note: String,
    pub country: Option<String>,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub paypal_email: Option<String>,
    pub file_path: Option<StorageKey>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl BrandSubmissionForm {
    /// Blank optional fields become `None` so they are neither validated nor sent.
    pub fn normalize(&mut self) {
        self.brand_website = non_blank(&self.brand_website);
        self.contact_name = non_blank(&self.contact_name);
        self.contact_email = non_blank(&self.contact_email);
        self.contact_designation = non_blank(&self.contact_designation);
        self.country = non_blank(&self.country);
    }

    /// Validate the draft and build the insert payload.
    pub fn to_row(&self) -> Result<BrandSubmissionRow, ValidationErrors> {
        self.validate()?;

        let (currency, payment) = match (self.currency, self.payment.as_ref()) {
            (Some(currency), Some(payment)) => (currency, payment),
            (currency, _) => {
                let mut errors = ValidationErrors::new();
                if currency.is_none() {
                    errors.add("currency", ValidationError::new("required"));
                } else {
                    errors.add("payment", ValidationError::new("required"));
                }
                return Err(errors);
            }
        };

        let mut row = BrandSubmissionRow {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            brand_name: self.brand_name.clone(),
            brand_website: self.brand_website.clone(),
            contact_name: self.contact_name.clone(),
            contact_email: self.contact_email.clone(),
            contact_designation: self.contact_designation.clone(),
            note: self.note.clone(),
            country: self.country.clone(),
            currency,
            payment_method: payment.method(),
            bank_name: None,
            bank_account_number: None,
            ifsc_code: None,
            paypal_email: None,
            file_path: self.file_path.clone(),
        };

        match payment {
            PaymentDetails::BankTransfer {
                bank_name,
                bank_account_number,
                ifsc_code,
            } => {
                row.bank_name = Some(bank_name.clone());
                row.bank_account_number = Some(bank_account_number.clone());
                row.ifsc_code = Some(ifsc_code.clone());
            }
            PaymentDetails::PayPal { paypal_email } => {
                row.paypal_email = Some(paypal_email.clone());
            }
        }

        Ok(row)
    }
}

/// Business-facing document submission draft (document type B, `rne_submissions`)
///
/// `unique_id` is chosen by the submitter and must be unused; the store enforces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BusinessSubmissionForm {
    #[validate(length(min = 1, message = "Unique ID is required"))]
    pub unique_id: String,
    #[validate(length(min = 1, message = "Business name is required"))]
    pub business_name: String,
    #[validate(url(message = "Enter a valid business website"))]
    pub business_website: String,
    #[validate(length(min = 1, message = "Contact person name is required"))]
    pub contact_name: String,
    #[validate(email(message = "Enter a valid contact email"))]
    pub contact_email: String,
    #[validate(length(min = 1, message = "Contact person designation is required"))]
    pub contact_designation: String,
    #[validate(length(min = 1, message = "A note is required"))]
    pub note: String,
}
