//! Persistent store configuration types

use cacheside_application::ports::registry::StoreProviderConfig;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STORE_PROVIDER;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Registered provider name (`memory`, `mongo`)
    pub provider: String,

    /// Connection URI
    pub uri: Option<String>,

    /// Database name
    pub database: Option<String>,

    /// Collection name
    pub collection: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_STORE_PROVIDER.to_string(),
            uri: None,
            database: None,
            collection: None,
        }
    }
}

impl StoreConfig {
    /// Registry lookup config for this section
    pub fn provider_config(&self) -> StoreProviderConfig {
        let mut config = StoreProviderConfig::new(&self.provider);
        config.uri.clone_from(&self.uri);
        config.database.clone_from(&self.database);
        config.collection.clone_from(&self.collection);
        config
    }
}
