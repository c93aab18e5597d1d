//! Ports (interfaces) implemented by the providers crate
//!
//! | Port | Module |
//! |------|--------|
//! | [`CacheProvider`] | [`providers::cache`] |
//! | [`EntityRepository`], [`TransactionManager`] | [`repositories`] |
//! | [`LockProvider`] | [`infrastructure::lock`] |

pub mod infrastructure;
pub mod providers;
pub mod repositories;

pub use infrastructure::{LockGuard, LockProvider};
pub use providers::{CacheEntryConfig, CacheProvider, CacheStats};
pub use repositories::{EntityRepository, TransactionManager};
