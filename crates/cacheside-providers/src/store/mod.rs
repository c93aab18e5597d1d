//! Persistent Store Implementations
//!
//! | Provider | Identifiers | Transactions |
//! |----------|-------------|--------------|
//! | [`InMemoryEntityStore`] | minted 24-hex | ignored |
//! | [`MongoEntityStore`] | `ObjectId` hex | client sessions |

#[cfg(feature = "store-memory")]
pub mod memory;
#[cfg(feature = "store-mongo")]
pub mod mongo;

#[cfg(feature = "store-memory")]
pub use memory::InMemoryEntityStore;
#[cfg(feature = "store-mongo")]
pub use mongo::{MongoEntityStore, MongoSession};
