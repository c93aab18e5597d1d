//! Moka in-memory cache provider
//!
//! Concurrent in-process cache built on Moka.
//!
//! ## Features
//!
//! - Per-entry TTL, taken from each write's [`CacheEntryConfig`]
//! - Atomic set-if-absent and compare-and-delete through Moka's entry API
//! - Capacity-bounded eviction
//!
//! Locks taken through this provider only exclude loaders in the same
//! process.
//!
//! ## Example
//!
//! ```ignore
//! use cacheside_providers::cache::MokaCacheProvider;
//!
//! let provider = MokaCacheProvider::with_capacity(1000);
//! ```

use crate::constants::MOKA_DEFAULT_MAX_CAPACITY;
use async_trait::async_trait;
use cacheside_domain::error::{Error, Result};
use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Stored value together with the TTL it was written with
#[derive(Debug, Clone)]
struct CachedValue {
    json: String,
    ttl: Duration,
}

/// Expire each entry after the TTL it was written with
struct PerEntryTtl;

impl Expiry<String, CachedValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based in-memory cache provider
#[derive(Clone)]
pub struct MokaCacheProvider {
    cache: Cache<String, CachedValue>,
    max_capacity: u64,
    stats: Arc<RwLock<CacheStats>>,
}

impl Default for MokaCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MokaCacheProvider {
    /// Create a new Moka cache provider with default settings
    pub fn new() -> Self {
        Self::with_capacity(MOKA_DEFAULT_MAX_CAPACITY)
    }

    /// Create a new Moka cache provider holding at most `max_capacity` entries
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            cache,
            max_capacity,
            stats: Arc::new(RwLock::new(CacheStats::new())),
        }
    }

    /// Get the maximum capacity of the cache
    pub fn max_capacity(&self) -> u64 {
        self.max_capacity
    }

    fn record(&self, hit: bool) {
        if let Ok(mut stats) = self.stats.write() {
            if hit {
                stats.record_hit();
            } else {
                stats.record_miss();
            }
        }
    }

    fn entry(value: &str, config: &CacheEntryConfig) -> CachedValue {
        CachedValue {
            json: value.to_string(),
            ttl: config.effective_ttl(),
        }
    }
}

#[async_trait]
impl CacheProvider for MokaCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let value = self.cache.get(key).await.map(|entry| entry.json);
        self.record(value.is_some());
        Ok(value)
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        self.cache
            .insert(key.to_string(), Self::entry(value, &config))
            .await;
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        config: CacheEntryConfig,
    ) -> Result<bool> {
        let entry = self
            .cache
            .entry_by_ref(key)
            .or_insert(Self::entry(value, &config))
            .await;
        Ok(entry.is_fresh())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        let result = self
            .cache
            .entry_by_ref(key)
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) if entry.value().json == expected => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
        Ok(matches!(result, CompResult::Removed(_)))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        // Run pending tasks to ensure entry_count is accurate
        self.cache.run_pending_tasks().await;
        let mut stats = self
            .stats
            .read()
            .map_err(|_| Error::cache("Failed to read cache stats"))?
            .clone();
        stats.entries = self.cache.entry_count();
        Ok(stats)
    }

    async fn size(&self) -> Result<usize> {
        self.cache.run_pending_tasks().await;
        Ok(usize::try_from(self.cache.entry_count()).unwrap_or(usize::MAX))
    }

    fn provider_name(&self) -> &str {
        "moka"
    }
}

impl std::fmt::Debug for MokaCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheProvider")
            .field("max_capacity", &self.max_capacity)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use cacheside_application::ports::registry::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry,
};

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static MOKA_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "moka",
    description: "Moka in-process cache with per-entry TTL",
    factory: |config: &CacheProviderConfig| {
        let provider = match config.max_capacity {
            Some(max_capacity) => MokaCacheProvider::with_capacity(max_capacity),
            None => MokaCacheProvider::new(),
        };
        Ok(Arc::new(provider))
    },
};
