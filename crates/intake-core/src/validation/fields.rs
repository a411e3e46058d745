//! Field rules the `validator` derive cannot express on its own.

use regex::Regex;
use std::sync::LazyLock;
use validator::{ValidateEmail, ValidationError};

use crate::models::PaymentDetails;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

static PHONE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9()\-.\s]+$")
        .expect("phone pattern is a valid regex")
});

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Accepts international-looking phone numbers: an optional leading `+`, digits,
/// spaces, dots, dashes and parentheses, with 7 to 15 digits in total.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(invalid("required", "Phone number is required"));
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !PHONE_SHAPE.is_match(phone) || !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(invalid("phone", "Enter a valid phone number"));
    }

    Ok(())
}

/// Every field of the selected payment method is required.
pub fn validate_payment(payment: &PaymentDetails) -> Result<(), ValidationError> {
    match payment {
        PaymentDetails::BankTransfer {
            bank_name,
            bank_account_number,
            ifsc_code,
        } => {
            if bank_name.trim().is_empty() {
                return Err(invalid("bank_name", "Bank name is required"));
            }
            if bank_account_number.trim().is_empty() {
                return Err(invalid(
                    "bank_account_number",
                    "Bank account number is required",
                ));
            }
            if ifsc_code.trim().is_empty() {
                return Err(invalid("ifsc_code", "IFSC code is required"));
            }
        }
        PaymentDetails::PayPal { paypal_email } => {
            if !paypal_email.validate_email() {
                return Err(invalid("paypal_email", "Enter a valid PayPal email"));
            }
        }
    }

    Ok(())
}
