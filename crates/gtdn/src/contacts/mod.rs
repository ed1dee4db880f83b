//! Contact form and newsletter endpoints behind a Turnstile captcha.

pub mod captcha;
pub mod form;
pub mod mailer;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use captcha::{CaptchaError, CaptchaVerifier, TurnstileVerifier};
pub use form::{ContactForm, ContactRequest, NewsletterRequest};
pub use mailer::{MailError, Mailer, Notification, SmtpMailer};
pub use repository::{
    ContactRepository, ContactSubmission, NewsletterSubscriber, RepositoryError,
};
pub use router::{contacts_router, contacts_router_with_throttle};
pub use service::ContactService;

use crate::error::{AppError, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("invalid form: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("captcha rejected: {0}")]
    Captcha(CaptchaError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

impl ContactError {
    /// Field errors pass through; storage and delivery failures become a
    /// 500 carrying `failure`.
    pub fn reported_as(self, failure: &str) -> AppError {
        match self {
            Self::Validation(errors) => AppError::Validation(errors),
            Self::Captcha(err) => {
                AppError::Validation(ValidationErrors::single(service::TOKEN_FIELD, err.to_string()))
            }
            other @ (Self::Repository(_) | Self::Mail(_)) => {
                tracing::error!(error = %other, "contact request failed");
                AppError::Internal(failure.to_string())
            }
        }
    }
}
