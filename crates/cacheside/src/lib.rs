//! # Cacheside
//!
//! Cache-aside access to stored entities: reads are served from a shared
//! cache and loaded under a per-entity stampede lock on a miss, writes
//! invalidate the cached snapshot.
//!
//! ## Example
//!
//! ```ignore
//! use cacheside::infrastructure::{AppConfig, ServiceBootstrap};
//!
//! let services = ServiceBootstrap::new(AppConfig::default()).build().await?;
//! let user = services.users.find_one("65a1f0c2e4b0a1b2c3d4e5f6").await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - entities, errors and port traits
//! - `application` - the access service, lock, backoff and provider registries
//! - `infrastructure` - configuration, logging and bootstrap
//! - `cli` - the `cacheside` command line

/// Domain layer - core types and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use cacheside_domain::*;
}

/// Application layer - use cases
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use cacheside_application::*;
}

/// Infrastructure layer - config, logging and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use cacheside_infrastructure::*;
}

pub mod cli;

// Re-export commonly used domain types at the crate root
pub use domain::*;

pub use application::{AccessPolicy, EntityAccessService, RetryPolicy};
pub use infrastructure::{CachesideServices, ServiceBootstrap};
