//! Provider registries
//!
//! Backends are discovered by name at startup. Each adapter in the providers
//! crate contributes a static entry to a `linkme` distributed slice declared
//! here; nothing in this crate names a concrete backend.
//!
//! ```text
//! providers crate                      this module
//! ───────────────                      ───────────
//! #[distributed_slice(CACHE_PROVIDERS)]  ──►  CACHE_PROVIDERS: [CacheProviderEntry]
//! static MOKA: CacheProviderEntry             │
//!                                              ▼
//! [cache] provider = "moka"  ───────────►  resolve_cache_provider(config)
//! ```

pub mod cache;
pub mod store;

pub use cache::{
    CACHE_PROVIDERS, CacheProviderConfig, CacheProviderEntry, list_cache_providers,
    resolve_cache_provider,
};
pub use store::{
    STORE_PROVIDERS, StoreHandle, StoreProviderConfig, StoreProviderEntry, UserRepository,
    list_store_providers, resolve_store_provider,
};
