use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::validate_phone;

/// Registration form (`rne_registrations`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    /// External profile URL
    #[validate(url(message = "Enter a valid LinkedIn profile URL"))]
    pub linkedin: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RegistrationForm {
        RegistrationForm {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            linkedin: "https://www.linkedin.com/in/asha".to_string(),
        }
    }

    #[test]
    fn test_filled_form_is_valid() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = RegistrationForm::default().validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["name", "email", "phone", "linkedin"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_bad_shapes_are_rejected() {
        let mut form = filled();
        form.email = "not-an-email".to_string();
        form.linkedin = "linkedin".to_string();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("linkedin"));
        assert!(!fields.contains_key("name"));
    }
}
