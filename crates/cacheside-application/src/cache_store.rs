//! Fail-open cache facade
//!
//! Typed access to a [`CacheProvider`] for the access layer. The cache is an
//! optimization, never a correctness dependency: every backend failure is
//! logged at `warn` and reported as "no effect" (a miss, a skipped write, a
//! skipped delete).

use cacheside_domain::CacheKey;
use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Shared cache wrapper that never surfaces backend errors
#[derive(Clone)]
pub struct CacheStore {
    provider: Arc<dyn CacheProvider>,
}

impl CacheStore {
    /// Wrap a cache provider
    pub fn new(provider: Arc<dyn CacheProvider>) -> Self {
        Self { provider }
    }

    /// Get the underlying cache provider as an Arc
    pub fn as_provider(&self) -> Arc<dyn CacheProvider> {
        Arc::clone(&self.provider)
    }

    /// Read and decode a cached snapshot
    ///
    /// Backend errors and undecodable entries both read as a miss. An
    /// undecodable entry is also deleted so the next load replaces it.
    pub async fn get<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        let json = match self.provider.get_json(key.as_str()).await {
            Ok(json) => json?,
            Err(error) => {
                warn!(key = %key, error = %error, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key = %key, error = %error, "Dropping undecodable cache entry");
                self.invalidate(key).await;
                None
            }
        }
    }

    /// Encode and store a snapshot with the given TTL
    ///
    /// Returns whether the value was written.
    pub async fn set<T>(&self, key: &CacheKey, value: &T, ttl: Duration) -> bool
    where
        T: Serialize + Sync,
    {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(error) => {
                warn!(key = %key, error = %error, "Failed to serialize value for cache");
                return false;
            }
        };

        let config = CacheEntryConfig::new().with_ttl(ttl);
        match self.provider.set_json(key.as_str(), &json, config).await {
            Ok(()) => true,
            Err(error) => {
                warn!(key = %key, error = %error, "Cache write failed, skipping population");
                false
            }
        }
    }

    /// Delete a cached snapshot
    ///
    /// Returns whether an entry was removed. A backend failure returns false.
    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        match self.provider.delete(key.as_str()).await {
            Ok(deleted) => deleted,
            Err(error) => {
                warn!(key = %key, error = %error, "Cache invalidation failed");
                false
            }
        }
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}
