//! Cache and lock key derivation

use std::fmt;

use crate::constants::{CACHE_KEY_SEPARATOR, LOCK_KEY_SUFFIX};
use crate::entities::Entity;

/// Deterministic cache key `"<entityName>:<id>"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for an entity name and id
    pub fn new(entity_name: &str, id: &str) -> Self {
        Self(format!("{entity_name}{CACHE_KEY_SEPARATOR}{id}"))
    }

    /// Build the key for entity type `E`
    pub fn for_entity<E: Entity>(id: &str) -> Self {
        Self::new(E::ENTITY_NAME, id)
    }

    /// Lock key guarding loads of this entry: `"<entityName>:<id>:lock"`
    pub fn lock_key(&self) -> String {
        format!("{}{CACHE_KEY_SEPARATOR}{LOCK_KEY_SUFFIX}", self.0)
    }

    /// Key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
