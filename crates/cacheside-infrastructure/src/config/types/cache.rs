//! Cache configuration types

use std::time::Duration;

use cacheside_application::ports::registry::CacheProviderConfig;
use cacheside_domain::constants::DEFAULT_DATA_TTL_SECS;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CACHE_PROVIDER;

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Registered provider name (`moka`, `redis`, `null`)
    pub provider: String,

    /// Connection URI (for distributed caches)
    pub uri: Option<String>,

    /// Maximum number of entries (for in-process caches)
    pub max_capacity: Option<u64>,

    /// Lifetime of a cached entity snapshot in seconds
    pub data_ttl_secs: u64,

    /// Prefix for every key, so deployments can share one backend
    pub namespace: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_CACHE_PROVIDER.to_string(),
            uri: None,
            max_capacity: None,
            data_ttl_secs: DEFAULT_DATA_TTL_SECS,
            namespace: None,
        }
    }
}

impl CacheConfig {
    /// Snapshot lifetime
    pub fn data_ttl(&self) -> Duration {
        Duration::from_secs(self.data_ttl_secs)
    }

    /// Registry lookup config for this section
    pub fn provider_config(&self) -> CacheProviderConfig {
        let mut config = CacheProviderConfig::new(&self.provider);
        config.uri.clone_from(&self.uri);
        config.max_capacity = self.max_capacity;
        config
    }
}
