use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::captcha::CaptchaVerifier;
use super::form::{ContactRequest, NewsletterRequest};
use super::mailer::{contact_notification, newsletter_notification, Mailer};
use super::repository::{ContactRepository, ContactSubmission, NewsletterSubscriber};
use super::ContactError;
use crate::error::ValidationErrors;
use crate::request::ClientIp;

pub const TOKEN_FIELD: &str = "turnstileToken";
pub const TOKEN_REQUIRED_MESSAGE: &str = "Turnstile verification is required.";

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> u64 {
    SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Captcha gate, storage and notification for the public forms.
pub struct ContactService<R, M, C> {
    repository: Arc<R>,
    mailer: Arc<M>,
    captcha: Arc<C>,
}

impl<R, M, C> ContactService<R, M, C>
where
    R: ContactRepository + 'static,
    M: Mailer + 'static,
    C: CaptchaVerifier + 'static,
{
    pub fn new(repository: Arc<R>, mailer: Arc<M>, captcha: Arc<C>) -> Self {
        Self {
            repository,
            mailer,
            captcha,
        }
    }

    /// Store a contact message and notify the recipient.
    pub async fn submit_contact(
        &self,
        request: &ContactRequest,
        client: &ClientIp,
    ) -> Result<ContactSubmission, ContactError> {
        self.verify_token(request.turnstile_token.as_deref(), client)
            .await?;
        let form = request.validate()?;

        let now = Utc::now();
        let submission = self.repository.insert_submission(ContactSubmission {
            id: next_submission_id(),
            name: form.name.clone(),
            surname: form.surname.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            message: form.message.clone(),
            gdpr_consent: true,
            client_ip: known_ip(client).map(str::to_string),
            created_at: now,
        })?;

        if let Err(err) = self.mailer.send(contact_notification(&form, now)).await {
            tracing::error!(
                submission = submission.id,
                error = %err,
                "failed to send contact form email"
            );
            return Err(err.into());
        }

        tracing::info!(submission = submission.id, "contact form submitted");
        Ok(submission)
    }

    /// Activate a newsletter subscription and notify the recipient.
    pub async fn subscribe(
        &self,
        request: &NewsletterRequest,
        client: &ClientIp,
    ) -> Result<NewsletterSubscriber, ContactError> {
        self.verify_token(request.turnstile_token.as_deref(), client)
            .await?;
        let email = request.validate()?;

        let now = Utc::now();
        let subscriber = self.repository.upsert_subscriber(&email, now)?;

        if let Err(err) = self
            .mailer
            .send(newsletter_notification(&email, now))
            .await
        {
            tracing::error!(email = %email, error = %err, "failed to send newsletter notification email");
            return Err(err.into());
        }

        Ok(subscriber)
    }

    async fn verify_token(&self, token: Option<&str>, client: &ClientIp) -> Result<(), ContactError> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Err(ValidationErrors::single(TOKEN_FIELD, TOKEN_REQUIRED_MESSAGE).into());
            }
        };

        self.captcha
            .verify(token, known_ip(client))
            .await
            .map_err(|err| {
                tracing::warn!(client = client.as_str(), error = %err, "captcha rejected");
                ContactError::Captcha(err)
            })
    }
}

fn known_ip(client: &ClientIp) -> Option<&str> {
    Some(client.as_str()).filter(|ip| *ip != ClientIp::UNKNOWN)
}
