//! Entity contract

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A record owned by the persistent store and mirrored in the cache.
///
/// The cache only ever holds a JSON snapshot of an entity, so every entity
/// must round-trip through `serde_json` unchanged.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Name used as the first segment of cache and lock keys (e.g. `"user"`)
    const ENTITY_NAME: &'static str;

    /// Store-assigned identifier
    fn id(&self) -> &str;
}

/// Builds a new entity from its creation input once the store has minted an id.
pub trait FromCreate<C>: Entity {
    /// Construct the entity with the given identifier
    fn from_create(id: String, dto: C) -> Self;
}
