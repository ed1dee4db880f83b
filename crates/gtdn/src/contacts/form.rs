//! Request bodies of the contact and newsletter endpoints and their field
//! validation.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::ValidationErrors;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const BLANK_MESSAGE: &str = "This field may not be blank.";
pub const EMAIL_MESSAGE: &str = "Enter a valid email address.";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number.";
pub const GDPR_MESSAGE: &str = "You must agree to the processing of personal data.";

fn phone_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[+]?[0-9\s\-()]+$").ok())
        .as_ref()
}

/// Contact form body as posted by the site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub gdpr_consent: Option<bool>,
    pub turnstile_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsletterRequest {
    pub email: Option<String>,
    pub turnstile_token: Option<String>,
}

/// A contact form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

struct FieldCheck<'a> {
    errors: &'a mut ValidationErrors,
}

impl FieldCheck<'_> {
    /// Trimmed text of `value`, or `None` after recording why it is unusable.
    fn text(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) -> Option<String> {
        let value = match value.map(str::trim) {
            None => {
                self.errors.add(field, REQUIRED_MESSAGE);
                return None;
            }
            Some("") => {
                self.errors.add(field, BLANK_MESSAGE);
                return None;
            }
            Some(value) => value,
        };

        let length = value.chars().count();
        let before = self.errors.field(field).map_or(0, <[String]>::len);
        if length > max {
            self.errors.add(
                field,
                format!("Ensure this field has no more than {max} characters."),
            );
        }
        if length < min {
            self.errors.add(
                field,
                format!("Ensure this field has at least {min} characters."),
            );
        }
        let after = self.errors.field(field).map_or(0, <[String]>::len);
        (before == after).then(|| value.to_string())
    }

    fn email(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let email = self.text(field, value, 1, 254)?;
        if lettre::Address::from_str(&email).is_err() {
            self.errors.add(field, EMAIL_MESSAGE);
            return None;
        }
        Some(email)
    }
}

impl ContactRequest {
    pub fn validate(&self) -> Result<ContactForm, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut check = FieldCheck {
            errors: &mut errors,
        };

        let name = check.text("name", self.name.as_deref(), 2, 50);
        let surname = check.text("surname", self.surname.as_deref(), 2, 50);
        let email = check.email("email", self.email.as_deref());
        let mut phone = check.text("phone", self.phone.as_deref(), 9, 20);
        let message = check.text("message", self.message.as_deref(), 10, 1000);

        if let Some(value) = phone.as_deref() {
            if !phone_pattern().is_some_and(|pattern| pattern.is_match(value)) {
                errors.add("phone", PHONE_MESSAGE);
                phone = None;
            }
        }

        match self.gdpr_consent {
            None => errors.add("gdprConsent", REQUIRED_MESSAGE),
            Some(false) => errors.add("gdprConsent", GDPR_MESSAGE),
            Some(true) => {}
        }

        match (name, surname, email, phone, message) {
            (Some(name), Some(surname), Some(email), Some(phone), Some(message))
                if errors.is_empty() =>
            {
                Ok(ContactForm {
                    name,
                    surname,
                    email,
                    phone,
                    message,
                })
            }
            _ => Err(errors),
        }
    }
}

impl NewsletterRequest {
    /// The subscriber address.
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let email = FieldCheck {
            errors: &mut errors,
        }
        .email("email", self.email.as_deref());
        match email {
            Some(email) if errors.is_empty() => Ok(email),
            _ => Err(errors),
        }
    }
}
