//! Store Provider Registry
//!
//! Auto-registration for persistent stores of the shipped `User` entity.
//! Store construction may need network I/O (connect, ping), so factories
//! return a boxed future.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cacheside_domain::ports::repositories::{EntityRepository, TransactionManager};
use cacheside_domain::{CreateUserDto, UpdateUserDto, User};
use futures::future::BoxFuture;

/// Repository trait object for users
pub type UserRepository = dyn EntityRepository<User, CreateUserDto, UpdateUserDto>;

/// Configuration for store provider creation
#[derive(Debug, Clone, Default)]
pub struct StoreProviderConfig {
    /// Provider name (e.g., "memory", "mongo")
    pub provider: String,
    /// Connection URI
    pub uri: Option<String>,
    /// Database name
    pub database: Option<String>,
    /// Collection / table name
    pub collection: Option<String>,
    /// Additional provider-specific configuration
    pub extra: HashMap<String, String>,
}

impl StoreProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the URI
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the database name
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the collection name
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }
}

/// A ready store: the repository plus its transaction manager, if any
#[derive(Clone)]
pub struct StoreHandle {
    /// User repository
    pub repository: Arc<UserRepository>,
    /// Transaction support, when the backend has it
    pub transactions: Option<Arc<dyn TransactionManager>>,
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("transactions", &self.transactions.is_some())
            .finish_non_exhaustive()
    }
}

/// Registry entry for store providers
pub struct StoreProviderEntry {
    /// Unique provider name (e.g., "memory", "mongo")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create a store
    pub factory: fn(StoreProviderConfig) -> BoxFuture<'static, Result<StoreHandle, String>>,
}

#[linkme::distributed_slice]
pub static STORE_PROVIDERS: [StoreProviderEntry] = [..];

/// Resolve and build a store by name from registry
pub async fn resolve_store_provider(config: &StoreProviderConfig) -> Result<StoreHandle, String> {
    let provider_name = &config.provider;

    for entry in STORE_PROVIDERS {
        if entry.name == provider_name {
            return (entry.factory)(config.clone()).await;
        }
    }

    let available: Vec<&str> = STORE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(format!(
        "Unknown store provider '{provider_name}'. Available providers: {available:?}"
    ))
}

/// List all registered store providers as (name, description) pairs
pub fn list_store_providers() -> Vec<(&'static str, &'static str)> {
    STORE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
