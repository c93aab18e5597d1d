//! Application ports
//!
//! Port traits live in `cacheside-domain`; they are re-exported here next to
//! the registry that adapters plug into.

pub mod registry;

pub use cacheside_domain::ports::{infrastructure, providers, repositories};
