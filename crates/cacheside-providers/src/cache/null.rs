//! Null cache provider
//!
//! Disables caching without touching the access layer: nothing is stored.

use async_trait::async_trait;
use cacheside_domain::error::Result;
use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};
use std::sync::Arc;

/// Cache that stores nothing
///
/// Every read misses and every lock attempt succeeds, so each read goes
/// straight to the store.
///
/// # Example
///
/// ```rust
/// use cacheside_providers::cache::NullCacheProvider;
///
/// let provider = NullCacheProvider::new();
/// // Reads always miss
/// ```
#[derive(Debug, Clone)]
pub struct NullCacheProvider;

impl NullCacheProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheProvider for NullCacheProvider {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        Ok(())
    }

    async fn set_if_absent(
        &self,
        _key: &str,
        _value: &str,
        _config: CacheEntryConfig,
    ) -> Result<bool> {
        // Nothing is ever present
        Ok(true)
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn delete_if_equals(&self, _key: &str, _expected: &str) -> Result<bool> {
        Ok(false)
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::new())
    }

    async fn size(&self) -> Result<usize> {
        Ok(0)
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use cacheside_application::ports::registry::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry,
};

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static NULL_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "null",
    description: "No-op cache, every read goes to the store",
    factory: |_config: &CacheProviderConfig| Ok(Arc::new(NullCacheProvider::new())),
};
