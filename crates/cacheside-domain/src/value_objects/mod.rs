//! Value objects

pub mod cache_key;
pub mod entity_id;
pub mod transaction;

pub use cache_key::CacheKey;
pub use entity_id::validate_entity_id;
pub use transaction::TransactionContext;
