//! Infrastructure Layer - Cacheside
//!
//! Cross-cutting concerns around the access layer:
//!
//! - [`config`]: layered configuration loading and validation
//! - [`logging`]: tracing subscriber setup
//! - [`error_ext`]: context helpers for foreign errors
//! - [`bootstrap`]: wiring configured providers into the access service

// Link every provider so the registries are complete
extern crate cacheside_providers;

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

pub use bootstrap::{CachesideServices, ServiceBootstrap, UserAccessService};
pub use config::{AppConfig, ConfigBuilder, ConfigLoader};
