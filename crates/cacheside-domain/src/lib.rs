//! Domain Layer - Cacheside
//!
//! Core types and contracts for cache-aside entity access. This crate has no
//! infrastructure dependencies: adapters implement the ports defined here.
//!
//! ## Contents
//!
//! - [`entities`]: the [`Entity`] contract and the `User` record
//! - [`value_objects`]: cache/lock keys, identifier validation, transaction handles
//! - [`ports`]: cache, lock and repository traits
//! - [`error`]: the shared error type and its classification rules

pub mod constants;
pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use entities::{CreateUserDto, Entity, FromCreate, UpdateUserDto, User};
pub use error::{Error, Result};
pub use value_objects::{CacheKey, TransactionContext};
