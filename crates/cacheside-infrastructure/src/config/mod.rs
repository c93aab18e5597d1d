//! Configuration management
//!
//! Layered loading (defaults, TOML file, environment) and validation of the
//! [`AppConfig`] that drives the service bootstrap.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, CacheConfig, LockConfig, LoggingConfig, StoreConfig};
