//! Application Layer - Cacheside
//!
//! Use cases of the cache-aside entity access layer, built only on the ports
//! defined in `cacheside-domain`.
//!
//! ## Architecture
//!
//! The application layer:
//! - Serves reads from the shared cache and loads misses under a stampede lock
//! - Invalidates cached snapshots on writes
//! - Declares the provider registries that adapters plug into
//! - Has no dependencies on infrastructure or concrete backends
//!
//! ## Modules
//!
//! - [`use_cases`]: [`EntityAccessService`] and the transaction helper
//! - [`cache_store`]: fail-open typed facade over a cache provider
//! - [`lock`]: stampede lock on top of a cache provider
//! - [`namespace`]: key prefixing for shared cache backends
//! - [`retry`]: bounded, jittered backoff
//! - [`ports::registry`]: linkme registries for cache and store providers

pub mod cache_store;
pub mod instrumentation;
pub mod lock;
pub mod namespace;
pub mod ports;
pub mod retry;
pub mod use_cases;

pub use cache_store::CacheStore;
pub use instrumentation::{InstrumentedRepository, StoreCallCounts};
pub use lock::CacheLockProvider;
pub use namespace::NamespacedCache;
pub use retry::RetryPolicy;
pub use use_cases::*;
