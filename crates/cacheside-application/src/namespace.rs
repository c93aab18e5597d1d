//! Key namespacing for shared cache backends
//!
//! Several deployments can share one Redis by giving each a namespace.
//! [`NamespacedCache`] prefixes every key with `"{namespace}:"` before it
//! reaches the backend, so snapshots and locks both stay apart.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use cacheside_domain::error::Result;
use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};

/// Cache provider decorator that prefixes keys with a namespace
pub struct NamespacedCache {
    inner: Arc<dyn CacheProvider>,
    namespace: String,
}

impl NamespacedCache {
    /// Wrap `inner`, prefixing every key with `namespace`
    pub fn new(inner: Arc<dyn CacheProvider>, namespace: impl Into<String>) -> Self {
        Self {
            inner,
            namespace: namespace.into(),
        }
    }

    /// Namespace in use
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn namespaced_key(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }
}

impl fmt::Debug for NamespacedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespacedCache")
            .field("namespace", &self.namespace)
            .field("inner", &self.inner.provider_name())
            .finish()
    }
}

#[async_trait]
impl CacheProvider for NamespacedCache {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_json(&self.namespaced_key(key)).await
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        self.inner
            .set_json(&self.namespaced_key(key), value, config)
            .await
    }

    async fn set_if_absent(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<bool> {
        self.inner
            .set_if_absent(&self.namespaced_key(key), value, config)
            .await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.inner.delete(&self.namespaced_key(key)).await
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        self.inner
            .delete_if_equals(&self.namespaced_key(key), expected)
            .await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(&self.namespaced_key(key)).await
    }

    // Bulk operations and counters span the whole backend
    async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }

    async fn stats(&self) -> Result<CacheStats> {
        self.inner.stats().await
    }

    async fn size(&self) -> Result<usize> {
        self.inner.size().await
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}
