//! # Cacheside - Provider Implementations
//!
//! Concrete backends for the ports defined in `cacheside-domain`. Each
//! provider registers itself in the `linkme` registries declared by
//! `cacheside-application`, so linking this crate is enough to make it
//! selectable by name from configuration.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Cache | `CacheProvider` | Moka, Redis, Null |
//! | Store | `EntityRepository`, `TransactionManager` | InMemory, MongoDB |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! cacheside-providers = { version = "0.1", default-features = false, features = ["cache-redis", "store-mongo"] }
//! ```

pub use cacheside_domain::error::{Error, Result};
pub use cacheside_domain::ports::providers::CacheProvider;

/// Provider-specific constants
pub mod constants;

/// Cache provider implementations
pub mod cache;

/// Persistent store implementations
pub mod store;
