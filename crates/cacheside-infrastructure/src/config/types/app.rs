//! Main application configuration

use cacheside_application::AccessPolicy;
use serde::{Deserialize, Serialize};

use super::{CacheConfig, LockConfig, LoggingConfig, StoreConfig};

/// Complete configuration of a Cacheside process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Cache backend configuration
    pub cache: CacheConfig,

    /// Stampede lock configuration
    pub lock: LockConfig,

    /// Persistent store configuration
    pub store: StoreConfig,
}

impl AppConfig {
    /// TTLs and backoff for the entity access service
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy {
            data_ttl: self.cache.data_ttl(),
            lock_ttl: self.lock.ttl(),
            retry: self.lock.retry_policy(),
        }
    }
}
