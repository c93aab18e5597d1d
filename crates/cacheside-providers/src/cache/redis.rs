//! Redis cache provider
//!
//! Snapshots and stampede locks live in one Redis shared by every process
//! of the deployment, so a lock taken here excludes loaders everywhere.
//! Entries expire through Redis TTLs; locks are taken with `SET NX EX` and
//! released with a Lua compare-and-delete.
//!
//! ## Example
//!
//! ```ignore
//! use cacheside_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::new("redis://localhost:6379")?;
//! ```

use crate::constants::{REDIS_DEFAULT_URI, REDIS_RELEASE_SCRIPT};
use async_trait::async_trait;
use cacheside_domain::error::{Error, Result};
use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use std::sync::{Arc, RwLock};
use tokio::sync::OnceCell;

/// Redis cache provider
#[derive(Clone)]
pub struct RedisCacheProvider {
    client: Client,
    connection: Arc<OnceCell<ConnectionManager>>,
    release_script: Script,
    stats: Arc<RwLock<CacheStats>>,
}

impl RedisCacheProvider {
    /// Open a client for `connection_string` (`redis://host:port/db`)
    ///
    /// No connection is made until the first command.
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string)
            .map_err(|e| Error::cache_with_source("Failed to create Redis client", e))?;

        Ok(Self {
            client,
            connection: Arc::new(OnceCell::new()),
            release_script: Script::new(REDIS_RELEASE_SCRIPT),
            stats: Arc::new(RwLock::new(CacheStats::new())),
        })
    }

    /// Client for `redis://{host}:{port}`
    pub fn with_host_port(host: &str, port: u16) -> Result<Self> {
        Self::new(&format!("redis://{host}:{port}"))
    }

    /// Handle to the connection shared by all clones of this provider
    ///
    /// The manager is built on first use and reconnects on its own. A failed
    /// first connect leaves the cell empty so the next command tries again.
    async fn get_connection(&self) -> Result<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await
            .map_err(|e| Error::cache_with_source("Failed to get Redis connection", e))?;
        Ok(manager.clone())
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

    /// TTL in whole seconds, at least one
    fn ttl_secs(config: &CacheEntryConfig) -> u64 {
        config.effective_ttl().as_secs().max(1)
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;

        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| Error::cache_with_source(format!("Redis GET failed for {key}"), e))?;
        self.record(value.is_some());
        Ok(value)
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        let mut conn = self.get_connection().await?;

        let (): () = conn
            .set_ex(key, value, Self::ttl_secs(&config))
            .await
            .map_err(|e| Error::cache_with_source(format!("Redis SET failed for {key}"), e))?;
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        config: CacheEntryConfig,
    ) -> Result<bool> {
        let mut conn = self.get_connection().await?;

        // SET replies OK when written and nil when NX found the key
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(Self::ttl_secs(&config))
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::cache_with_source(format!("Redis SET NX failed for {key}"), e))?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;

        let count: i64 = conn
            .del(key)
            .await
            .map_err(|e| Error::cache_with_source(format!("Redis DEL failed for {key}"), e))?;
        Ok(count > 0)
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;

        let removed: i64 = self
            .release_script
            .key(key)
            .arg(expected)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                Error::cache_with_source(format!("Redis compare-and-delete failed for {key}"), e)
            })?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;

        let count: i64 = conn
            .exists(key)
            .await
            .map_err(|e| Error::cache_with_source(format!("Redis EXISTS failed for {key}"), e))?;
        Ok(count > 0)
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;

        redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::cache_with_source("Redis FLUSHDB failed", e))
    }

    async fn stats(&self) -> Result<CacheStats> {
        let mut conn = self.get_connection().await?;

        let dbsize: redis::RedisResult<u64> = redis::cmd("DBSIZE").query_async(&mut conn).await;

        let mut stats = self
            .stats
            .read()
            .map_err(|_| Error::cache("Failed to read cache stats"))?
            .clone();
        stats.entries = dbsize.unwrap_or(0);
        Ok(stats)
    }

    async fn size(&self) -> Result<usize> {
        let mut conn = self.get_connection().await?;

        redis::cmd("DBSIZE")
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::cache_with_source("Redis DBSIZE failed", e))
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheProvider").finish_non_exhaustive()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use cacheside_application::ports::registry::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry,
};

/// Factory function for creating Redis cache provider instances.
fn redis_cache_factory(
    config: &CacheProviderConfig,
) -> std::result::Result<Arc<dyn CacheProvider>, String> {
    let uri = config.uri.as_deref().unwrap_or(REDIS_DEFAULT_URI);

    let provider =
        RedisCacheProvider::new(uri).map_err(|e| format!("Failed to create Redis provider: {e}"))?;

    Ok(Arc::new(provider))
}

#[linkme::distributed_slice(CACHE_PROVIDERS)]
static REDIS_PROVIDER: CacheProviderEntry = CacheProviderEntry {
    name: "redis",
    description: "Redis distributed cache, locks span processes",
    factory: redis_cache_factory,
};
