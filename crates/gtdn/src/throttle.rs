//! Request budgets.
//!
//! [`OutboundThrottle`] caps calls this service makes to an upstream API,
//! shared by every caller. [`ClientThrottle`] caps what a single client may
//! ask of this service.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Fixed-window counter for outbound calls.
#[derive(Debug)]
pub struct OutboundThrottle {
    key: String,
    max_requests: u32,
    window: Duration,
    state: Mutex<Option<WindowState>>,
}

#[derive(Debug, Clone, Copy)]
struct WindowState {
    opened_at: Instant,
    count: u32,
}

impl OutboundThrottle {
    pub fn new(key: impl Into<String>, max_requests: u32, window: Duration) -> Self {
        Self {
            key: key.into(),
            max_requests,
            window,
            state: Mutex::new(None),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Consume one slot of the current window, if any is left.
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    fn allow_at(&self, now: Instant) -> bool {
        let mut state = lock(&self.state);
        match state.as_mut() {
            Some(window) if now.duration_since(window.opened_at) < self.window => {
                if window.count >= self.max_requests {
                    return false;
                }
                window.count += 1;
                true
            }
            _ => {
                if self.max_requests == 0 {
                    return false;
                }
                *state = Some(WindowState {
                    opened_at: now,
                    count: 1,
                });
                true
            }
        }
    }

    /// Time until the current window closes, when one is open.
    pub fn wait_time(&self) -> Option<Duration> {
        let state = lock(&self.state);
        let window = (*state)?;
        let elapsed = window.opened_at.elapsed();
        (elapsed < self.window).then(|| self.window - elapsed)
    }
}

/// `N/period` rate such as `30/minute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    pub requests: usize,
    pub period: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid rate '{0}': expected '<count>/<second|minute|hour|day>'")]
pub struct RateParseError(String);

impl FromStr for Rate {
    type Err = RateParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || RateParseError(raw.to_string());
        let (count, period) = raw.split_once('/').ok_or_else(invalid)?;
        let requests = count.trim().parse::<usize>().map_err(|_| invalid())?;
        let seconds = match period.trim().chars().next() {
            Some('s') => 1,
            Some('m') => 60,
            Some('h') => 3600,
            Some('d') => 86_400,
            _ => return Err(invalid()),
        };
        Ok(Self {
            requests,
            period: Duration::from_secs(seconds),
        })
    }
}

/// Sliding-history throttle keyed by client identity. Clients with no
/// request inside the period are swept once per period.
#[derive(Debug)]
pub struct ClientThrottle {
    scope: &'static str,
    rate: Rate,
    history: Mutex<ClientHistory>,
}

#[derive(Debug, Default)]
struct ClientHistory {
    clients: HashMap<String, VecDeque<Instant>>,
    swept_at: Option<Instant>,
}

impl ClientHistory {
    fn sweep(&mut self, now: Instant, period: Duration) {
        if self
            .swept_at
            .is_some_and(|swept| now.duration_since(swept) < period)
        {
            return;
        }
        self.clients.retain(|_, entries| {
            entries
                .back()
                .is_some_and(|latest| now.duration_since(*latest) < period)
        });
        self.swept_at = Some(now);
    }
}

impl ClientThrottle {
    pub fn new(scope: &'static str, rate: Rate) -> Self {
        Self {
            scope,
            rate,
            history: Mutex::new(ClientHistory::default()),
        }
    }

    pub fn ares_search() -> Self {
        Self::new("ares_search", Rate { requests: 30, period: Duration::from_secs(60) })
    }

    pub fn ares_detail() -> Self {
        Self::new("ares_detail", Rate { requests: 60, period: Duration::from_secs(60) })
    }

    pub fn contact_form() -> Self {
        Self::new("contact_form", Rate { requests: 5, period: Duration::from_secs(3600) })
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }

    /// Number of clients currently holding history.
    pub fn tracked_clients(&self) -> usize {
        lock(&self.history).clients.len()
    }

    /// Record a request from `client`, or reject it with the wait until the
    /// oldest request in the history ages out.
    pub fn check(&self, client: &str) -> Result<(), ThrottleRejection> {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> Result<(), ThrottleRejection> {
        let mut history = lock(&self.history);
        history.sweep(now, self.rate.period);
        let entries = history.clients.entry(client.to_string()).or_default();

        while let Some(oldest) = entries.front() {
            if now.duration_since(*oldest) >= self.rate.period {
                entries.pop_front();
            } else {
                break;
            }
        }

        if entries.len() >= self.rate.requests {
            let wait = entries
                .front()
                .map(|oldest| self.rate.period.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.rate.period);
            tracing::warn!(scope = self.scope, client, ?wait, "client throttled");
            return Err(ThrottleRejection::new(wait));
        }

        entries.push_back(now);
        Ok(())
    }
}

/// Rejected request and how long the client should wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleRejection {
    wait: Duration,
}

impl ThrottleRejection {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Whole seconds, rounded up, never zero.
    pub fn wait_seconds(&self) -> u64 {
        let secs = self.wait.as_secs() + u64::from(self.wait.subsec_nanos() > 0);
        secs.max(1)
    }
}

impl fmt::Display for ThrottleRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request throttled for {} seconds", self.wait_seconds())
    }
}

impl std::error::Error for ThrottleRejection {}
