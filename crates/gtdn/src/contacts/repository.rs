use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: u64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub gdpr_consent: bool,
    pub client_ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    pub email: String,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
}

/// Storage abstraction so the contact service can be exercised in isolation.
pub trait ContactRepository: Send + Sync {
    fn insert_submission(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactSubmission, RepositoryError>;

    /// Activate the subscriber for `email`, creating it when absent.
    fn upsert_subscriber(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<NewsletterSubscriber, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
