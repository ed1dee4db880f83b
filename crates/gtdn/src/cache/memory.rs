use super::CacheStore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Interval between sweeps of expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Process-local store. Expired entries are dropped when read, and swept
/// on write at most once per [`SWEEP_INTERVAL`].
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<Entries>,
}

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, (String, Instant)>,
    swept_at: Option<Instant>,
}

impl MemoryCacheStore {
    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries()
            .values
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries();
        match entries.values.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Some(value.clone()),
            Some(_) => {
                entries.values.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now());
    }

    fn clear(&self) {
        self.entries().values.clear();
    }
}

impl MemoryCacheStore {
    fn set_at(&self, key: &str, value: String, ttl: Duration, now: Instant) {
        let mut entries = self.entries();
        let due = entries
            .swept_at
            .map_or(true, |swept| now.duration_since(swept) >= SWEEP_INTERVAL);
        if due {
            entries.values.retain(|_, (_, expires_at)| *expires_at > now);
            entries.swept_at = Some(now);
        }
        entries.values.insert(key.to_string(), (value, now + ttl));
    }

    #[cfg(test)]
    fn stored(&self) -> usize {
        self.entries().values.len()
    }
}
