//! Use Cases
//!
//! Application services orchestrating repositories, caches and locks.

pub mod entity_access_service;
pub mod transaction;

pub use entity_access_service::{AccessPolicy, EntityAccessService};
pub use transaction::run_in_transaction;
