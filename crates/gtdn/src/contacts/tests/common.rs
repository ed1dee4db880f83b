use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::contacts::{
    CaptchaError, CaptchaVerifier, ContactRepository, ContactRequest, ContactService,
    ContactSubmission, MailError, Mailer, NewsletterSubscriber, Notification, RepositoryError,
};

pub(super) type TestService = ContactService<MemoryContacts, RecordingMailer, StubCaptcha>;

#[derive(Default)]
pub(super) struct MemoryContacts {
    submissions: Mutex<Vec<ContactSubmission>>,
    subscribers: Mutex<HashMap<String, NewsletterSubscriber>>,
    unavailable: bool,
}

impl MemoryContacts {
    pub(super) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub(super) fn submissions(&self) -> Vec<ContactSubmission> {
        self.submissions.lock().expect("lock").clone()
    }

    pub(super) fn subscriber(&self, email: &str) -> Option<NewsletterSubscriber> {
        self.subscribers.lock().expect("lock").get(email).cloned()
    }

    pub(super) fn deactivate(&self, email: &str) {
        if let Some(subscriber) = self.subscribers.lock().expect("lock").get_mut(email) {
            subscriber.is_active = false;
        }
    }
}

impl ContactRepository for MemoryContacts {
    fn insert_submission(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactSubmission, RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::Unavailable("database offline".to_string()));
        }
        self.submissions
            .lock()
            .expect("lock")
            .push(submission.clone());
        Ok(submission)
    }

    fn upsert_subscriber(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<NewsletterSubscriber, RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::Unavailable("database offline".to_string()));
        }
        let mut guard = self.subscribers.lock().expect("lock");
        let subscriber = guard
            .entry(email.to_string())
            .or_insert_with(|| NewsletterSubscriber {
                email: email.to_string(),
                is_active: true,
                subscribed_at: now,
            });
        subscriber.is_active = true;
        Ok(subscriber.clone())
    }
}

#[derive(Default)]
pub(super) struct RecordingMailer {
    sent: Mutex<Vec<Notification>>,
    failing: bool,
}

impl RecordingMailer {
    pub(super) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub(super) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, notification: Notification) -> Result<(), MailError> {
        if self.failing {
            return Err(MailError::NotConfigured);
        }
        self.sent.lock().expect("lock").push(notification);
        Ok(())
    }
}

/// Captcha double with a fixed verdict that records `(token, remote_ip)`.
pub(super) struct StubCaptcha {
    verdict: Result<(), CaptchaError>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl StubCaptcha {
    pub(super) fn accepting() -> Self {
        Self::answering(Ok(()))
    }

    pub(super) fn answering(verdict: Result<(), CaptchaError>) -> Self {
        Self {
            verdict,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl CaptchaVerifier for StubCaptcha {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<(), CaptchaError> {
        self.calls
            .lock()
            .expect("lock")
            .push((token.to_string(), remote_ip.map(str::to_string)));
        self.verdict.clone()
    }
}

pub(super) struct Harness {
    pub(super) repository: Arc<MemoryContacts>,
    pub(super) mailer: Arc<RecordingMailer>,
    pub(super) captcha: Arc<StubCaptcha>,
    pub(super) service: Arc<TestService>,
}

pub(super) fn harness_with(
    repository: MemoryContacts,
    mailer: RecordingMailer,
    captcha: StubCaptcha,
) -> Harness {
    let repository = Arc::new(repository);
    let mailer = Arc::new(mailer);
    let captcha = Arc::new(captcha);
    let service = Arc::new(ContactService::new(
        repository.clone(),
        mailer.clone(),
        captcha.clone(),
    ));
    Harness {
        repository,
        mailer,
        captcha,
        service,
    }
}

pub(super) fn harness() -> Harness {
    harness_with(
        MemoryContacts::default(),
        RecordingMailer::default(),
        StubCaptcha::accepting(),
    )
}

pub(super) fn valid_contact_json() -> Value {
    json!({
        "name": "John",
        "surname": "Doe",
        "email": "john@example.com",
        "phone": "+420123456789",
        "message": "Hello, this is a test message for the contact form.",
        "gdprConsent": true,
        "turnstileToken": "valid-token"
    })
}

pub(super) fn valid_contact() -> ContactRequest {
    serde_json::from_value(valid_contact_json()).expect("contact fixture")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
