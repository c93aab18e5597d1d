//! Entity Repository Port
//!
//! Durable store keyed by entity identifier. `E` is the entity, `C` its
//! creation input and `U` its partial-update input.

use crate::entities::Entity;
use crate::error::Result;
use crate::value_objects::TransactionContext;
use async_trait::async_trait;

/// Persistent store for one entity type
///
/// Every method takes an optional transaction context. The repository is
/// the only component that interprets it; `None` means no explicit
/// transaction.
#[async_trait]
pub trait EntityRepository<E, C, U>: Send + Sync
where
    E: Entity,
    C: Send + 'static,
    U: Send + 'static,
{
    /// Create a new entity
    ///
    /// Fails with `Conflict` when a store constraint rejects the write.
    async fn create(&self, dto: C, tx: Option<&TransactionContext>) -> Result<E>;

    /// Find an entity by id
    ///
    /// Absence is `Ok(None)`. A malformed id is `InvalidArgument`.
    async fn find_by_id(&self, id: &str, tx: Option<&TransactionContext>) -> Result<Option<E>>;

    /// Apply a partial update and return the updated entity
    ///
    /// Absence is `Ok(None)`. A malformed id is `InvalidArgument`.
    async fn update(&self, id: &str, patch: U, tx: Option<&TransactionContext>)
    -> Result<Option<E>>;
}

/// Begins and ends store transactions
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Start a transaction
    async fn begin(&self) -> Result<TransactionContext>;

    /// Commit a transaction
    async fn commit(&self, ctx: TransactionContext) -> Result<()>;

    /// Abort a transaction, discarding its writes
    async fn abort(&self, ctx: TransactionContext) -> Result<()>;
}
