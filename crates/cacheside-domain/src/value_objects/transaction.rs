//! Opaque transaction handle
//!
//! The access layer threads a `TransactionContext` through to the store
//! untouched. Only the store that created it knows what the handle holds.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied transactional context
#[derive(Clone)]
pub struct TransactionContext {
    id: String,
    handle: Arc<dyn Any + Send + Sync>,
}

impl TransactionContext {
    /// Wrap a store-specific handle
    pub fn new<S: Into<String>, H: Any + Send + Sync>(id: S, handle: H) -> Self {
        Self {
            id: id.into(),
            handle: Arc::new(handle),
        }
    }

    /// Identifier used in logs
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Borrow the handle as the store's concrete type
    pub fn handle<H: Any + Send + Sync>(&self) -> Option<&H> {
        self.handle.downcast_ref::<H>()
    }
}

impl fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionContext")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
