//! Namespaced TTL cache shared by the upstream services.

mod memory;

pub use memory::MemoryCacheStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

/// Backing store holding serialized values with an expiry.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, ttl: Duration);
    fn clear(&self);
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache value could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Typed view over a [`CacheStore`] with keys of the form `prefix:part:part`.
#[derive(Clone)]
pub struct CacheService {
    prefix: &'static str,
    default_ttl: Duration,
    store: Arc<dyn CacheStore>,
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("prefix", &self.prefix)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl CacheService {
    pub fn new(prefix: &'static str, default_ttl: Duration, store: Arc<dyn CacheStore>) -> Self {
        Self {
            prefix,
            default_ttl,
            store,
        }
    }

    pub fn make_key(&self, parts: &[&str]) -> String {
        let mut key = String::from(self.prefix);
        for part in parts {
            key.push(':');
            key.push_str(part);
        }
        key
    }

    /// Deterministic digest of `params`: the first 16 hex characters of the
    /// SHA-256 over their JSON encoding with object keys sorted.
    pub fn hash_params<T: Serialize + ?Sized>(params: &T) -> Result<String, CacheError> {
        // `serde_json::Value` keeps object keys in a BTreeMap, so re-encoding
        // through it sorts them.
        let canonical = serde_json::to_string(&serde_json::to_value(params)?)?;
        let digest = Sha256::digest(canonical.as_bytes());
        let mut encoded = hex::encode(digest);
        encoded.truncate(16);
        Ok(encoded)
    }

    pub fn get<T: DeserializeOwned>(&self, parts: &[&str]) -> Option<T> {
        let key = self.make_key(parts);
        let raw = self.store.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(%key, "cache hit");
                Some(value)
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "discarding undecodable cache entry");
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(
        &self,
        value: &T,
        parts: &[&str],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let encoded = serde_json::to_string(value)?;
        self.store
            .set(&self.make_key(parts), encoded, ttl.unwrap_or(self.default_ttl));
        Ok(())
    }

    /// Round-trip a marker value through the store.
    pub fn ping(&self) -> bool {
        let key = self.make_key(&["health_check"]);
        self.store
            .set(&key, "\"ok\"".to_string(), Duration::from_secs(10));
        self.store.get(&key).as_deref() == Some("\"ok\"")
    }
}
