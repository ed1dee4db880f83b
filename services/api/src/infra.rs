use chrono::{DateTime, Utc};
use gtdn::cache::CacheService;
use gtdn::contacts::{ContactRepository, ContactSubmission, NewsletterSubscriber, RepositoryError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) cache: CacheService,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

/// Process-local storage for form submissions and newsletter subscribers.
#[derive(Default, Clone)]
pub(crate) struct InMemoryContactRepository {
    submissions: Arc<Mutex<Vec<ContactSubmission>>>,
    subscribers: Arc<Mutex<HashMap<String, NewsletterSubscriber>>>,
}

impl ContactRepository for InMemoryContactRepository {
    fn insert_submission(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactSubmission, RepositoryError> {
        let mut guard = lock(&self.submissions)?;
        if guard.iter().any(|stored| stored.id == submission.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(submission.clone());
        Ok(submission)
    }

    fn upsert_subscriber(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<NewsletterSubscriber, RepositoryError> {
        let mut guard = lock(&self.subscribers)?;
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

#[cfg(test)]
impl InMemoryContactRepository {
    pub(crate) fn submissions(&self) -> Vec<ContactSubmission> {
        self.submissions.lock().expect("lock").clone()
    }
}
