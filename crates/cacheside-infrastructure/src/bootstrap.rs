//! Service bootstrap
//!
//! Turns an [`AppConfig`] into a ready [`UserAccessService`]. Providers are
//! resolved from the registries by name, the cache gets the configured
//! namespace, and the store is wrapped in a call counter. The store's
//! transaction manager is kept when it has one.

use std::fmt;
use std::sync::Arc;

use cacheside_application::ports::registry::{
    UserRepository, resolve_cache_provider, resolve_store_provider,
};
use cacheside_application::{
    EntityAccessService, InstrumentedRepository, NamespacedCache, StoreCallCounts,
};
use cacheside_domain::error::{Error, Result};
use cacheside_domain::ports::providers::cache::CacheProvider;
use cacheside_domain::ports::repositories::TransactionManager;
use cacheside_domain::{CreateUserDto, UpdateUserDto, User};
use tracing::info;

use crate::config::AppConfig;
use crate::config::loader::validate_app_config;

/// Cache-aside access service for users
pub type UserAccessService = EntityAccessService<User, CreateUserDto, UpdateUserDto>;

type CountedUserRepository = InstrumentedRepository<User, CreateUserDto, UpdateUserDto>;

/// Builds services from configuration
#[derive(Debug, Clone)]
pub struct ServiceBootstrap {
    config: AppConfig,
}

impl ServiceBootstrap {
    /// Bootstrap from a loaded configuration
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validate the configuration, then connect the cache and the store
    pub async fn build(&self) -> Result<CachesideServices> {
        validate_app_config(&self.config)?;

        let mut cache = resolve_cache_provider(&self.config.cache.provider_config())
            .map_err(Error::configuration)?;
        if let Some(namespace) = &self.config.cache.namespace {
            cache = Arc::new(NamespacedCache::new(cache, namespace.clone()));
        }
        let store = resolve_store_provider(&self.config.store.provider_config())
            .await
            .map_err(Error::configuration)?;

        let counted = Arc::new(CountedUserRepository::new(store.repository));
        let repository: Arc<UserRepository> = counted.clone();
        let users = UserAccessService::with_cache_locks(
            repository,
            Arc::clone(&cache),
            self.config.access_policy(),
        );

        info!(
            cache = cache.provider_name(),
            store = %self.config.store.provider,
            transactions = store.transactions.is_some(),
            "Services ready"
        );

        Ok(CachesideServices {
            users,
            cache,
            transactions: store.transactions,
            store_calls: counted,
        })
    }
}

/// Services built by [`ServiceBootstrap`]
#[derive(Clone)]
pub struct CachesideServices {
    /// Cache-aside access to users
    pub users: UserAccessService,
    /// Shared cache backend
    pub cache: Arc<dyn CacheProvider>,
    /// Store transactions, when the store supports them
    pub transactions: Option<Arc<dyn TransactionManager>>,
    store_calls: Arc<CountedUserRepository>,
}

impl CachesideServices {
    /// Calls that reached the persistent store so far
    pub fn store_calls(&self) -> StoreCallCounts {
        self.store_calls.counts()
    }

    /// Reset the store call counters
    pub fn reset_store_calls(&self) {
        self.store_calls.reset();
    }
}

impl fmt::Debug for CachesideServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachesideServices")
            .field("users", &self.users)
            .field("cache", &self.cache.provider_name())
            .field("transactions", &self.transactions.is_some())
            .field("store_calls", &self.store_calls.counts())
            .finish()
    }
}
