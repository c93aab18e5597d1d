//! Cache Provider Port
//!
//! Port for the shared key/value cache behind the cache-aside layer. The
//! same backend also hosts stampede locks, so besides plain get/set/delete it
//! must offer an atomic set-if-absent.
//!
//! ## Provider Pattern
//!
//! Backends register themselves in the provider registry and are created
//! from configuration by name:
//!
//! | Name | Scope | Atomicity of `set_if_absent` |
//! |------|-------|------------------------------|
//! | `moka` | single process | moka entry API |
//! | `redis` | whole deployment | `SET NX EX` |
//! | `null` | none | always succeeds |

use crate::constants::DEFAULT_DATA_TTL_SECS;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-write options for a cache entry
///
/// Only the lifetime is configurable. An entry written without one lives
/// for the default data TTL.
///
/// # Example
///
/// ```
/// use cacheside_domain::ports::providers::cache::CacheEntryConfig;
/// use std::time::Duration;
///
/// let config = CacheEntryConfig::default().with_ttl(Duration::from_secs(10));
/// assert_eq!(config.effective_ttl(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryConfig {
    /// Lifetime of the entry
    pub ttl: Option<Duration>,
}

impl CacheEntryConfig {
    /// Entry config carrying the default data TTL
    pub fn new() -> Self {
        Self {
            ttl: Some(Duration::from_secs(DEFAULT_DATA_TTL_SECS)),
        }
    }

    /// Use `ttl` as the lifetime
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Use `secs` seconds as the lifetime
    #[must_use]
    pub fn with_ttl_secs(self, secs: u64) -> Self {
        self.with_ttl(Duration::from_secs(secs))
    }

    /// Lifetime to apply, the default data TTL when unset
    pub fn effective_ttl(&self) -> Duration {
        self.ttl
            .unwrap_or(Duration::from_secs(DEFAULT_DATA_TTL_SECS))
    }
}

impl Default for CacheEntryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hit/miss counters reported by a backend
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheStats {
    /// Reads that found an entry
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Entries currently held
    pub entries: u64,
    /// `hits / (hits + misses)`, 0.0 before the first read
    pub hit_rate: f64,
}

impl CacheStats {
    /// Zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a hit and refresh the hit rate
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.hit_rate = self.calculate_hit_rate();
    }

    /// Count a miss and refresh the hit rate
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.hit_rate = self.calculate_hit_rate();
    }

    #[allow(clippy::cast_precision_loss)]
    fn calculate_hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Key/value cache backend
///
/// Values are JSON strings; typed access lives one layer up. Every method is
/// fallible I/O, and callers in the access layer treat any `Err` as "the
/// operation had no effect".
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug {
    /// Stored JSON for `key`, `None` when absent or expired
    async fn get_json(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any existing value
    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()>;

    /// Atomically set a value only if the key does not exist
    ///
    /// # Returns
    /// True if this call wrote the value, false if the key was already present
    async fn set_if_absent(&self, key: &str, value: &str, config: CacheEntryConfig)
    -> Result<bool>;

    /// Remove `key`; true when an entry was removed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Delete a key only while it still holds `expected`
    ///
    /// The default implementation reads then deletes, which leaves a short
    /// window between the two calls. Backends with server-side scripting
    /// override it with an atomic version.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        match self.get_json(key).await? {
            Some(current) if current == expected => self.delete(key).await,
            _ => Ok(false),
        }
    }

    /// Whether `key` currently holds a value
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Drop every entry
    async fn clear(&self) -> Result<()>;

    /// Hit/miss counters
    async fn stats(&self) -> Result<CacheStats>;

    /// Number of entries held
    async fn size(&self) -> Result<usize>;

    /// Registry name of the backend (`moka`, `redis`, `null`)
    fn provider_name(&self) -> &str;
}
