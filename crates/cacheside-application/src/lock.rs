//! Stampede lock built on the cache backend
//!
//! A lock is a cache key written with set-if-absent and a TTL. The value is
//! a per-acquisition token (`locked:<uuid>`), and release deletes the key
//! only while it still holds that token, so a holder whose lock expired
//! cannot free a lock someone else has since taken.

use async_trait::async_trait;
use cacheside_domain::constants::LOCK_TOKEN_SENTINEL;
use cacheside_domain::error::Result;
use cacheside_domain::ports::infrastructure::lock::{LockGuard, LockProvider};
use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Lock provider backed by a [`CacheProvider`]
#[derive(Debug, Clone)]
pub struct CacheLockProvider {
    cache: Arc<dyn CacheProvider>,
}

impl CacheLockProvider {
    /// Create a lock provider on top of a cache backend
    pub fn new(cache: Arc<dyn CacheProvider>) -> Self {
        Self { cache }
    }

    fn new_token() -> String {
        format!("{LOCK_TOKEN_SENTINEL}:{}", Uuid::new_v4())
    }
}

#[async_trait]
impl LockProvider for CacheLockProvider {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LockGuard>> {
        let token = Self::new_token();
        let config = CacheEntryConfig::new().with_ttl(ttl);

        let acquired = self.cache.set_if_absent(key, &token, config).await?;
        debug!(key = key, acquired = acquired, "Lock attempt");

        Ok(acquired.then(|| LockGuard {
            key: key.to_string(),
            token,
        }))
    }

    async fn release(&self, guard: LockGuard) -> Result<()> {
        let released = self
            .cache
            .delete_if_equals(&guard.key, &guard.token)
            .await?;
        if !released {
            debug!(key = %guard.key, "Lock had already expired or changed hands");
        }
        Ok(())
    }
}
