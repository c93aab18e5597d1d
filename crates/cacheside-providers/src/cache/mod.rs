//! Cache Provider Implementations
//!
//! Backends for entity snapshots and stampede locks.
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`NullCacheProvider`] | Testing | Stores nothing, every lock is free |
//! | [`MokaCacheProvider`] | Local | In-process cache with per-entry TTL |
//! | [`RedisCacheProvider`] | Distributed | Redis-backed, locks span processes |
//!
//! ## Provider Selection Guide
//!
//! - **Development/Testing**: `NullCacheProvider` to bypass caching entirely
//! - **Single Instance**: `MokaCacheProvider`
//! - **Multi Instance**: `RedisCacheProvider`, the only backend whose locks
//!   exclude loaders in other processes

#[cfg(feature = "cache-moka")]
pub mod moka;
pub mod null;
#[cfg(feature = "cache-redis")]
pub mod redis;

#[cfg(feature = "cache-moka")]
pub use moka::MokaCacheProvider;
pub use null::NullCacheProvider;
#[cfg(feature = "cache-redis")]
pub use redis::RedisCacheProvider;

pub use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheStats};
