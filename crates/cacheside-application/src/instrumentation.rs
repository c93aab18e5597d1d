//! Store call counters
//!
//! [`InstrumentedRepository`] wraps any repository and counts the calls that
//! reach it, so the effect of the cache and the stampede lock on store
//! traffic can be observed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use cacheside_domain::entities::Entity;
use cacheside_domain::error::Result;
use cacheside_domain::ports::repositories::EntityRepository;
use cacheside_domain::value_objects::TransactionContext;

/// Snapshot of store call counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCallCounts {
    /// `create` calls
    pub creates: u64,
    /// `find_by_id` calls
    pub loads: u64,
    /// `update` calls
    pub updates: u64,
}

#[derive(Debug, Default)]
struct Counters {
    creates: AtomicU64,
    loads: AtomicU64,
    updates: AtomicU64,
}

/// Repository decorator counting calls to the inner repository
pub struct InstrumentedRepository<E, C, U>
where
    E: Entity,
    C: Send + 'static,
    U: Send + 'static,
{
    inner: Arc<dyn EntityRepository<E, C, U>>,
    counters: Counters,
}

impl<E, C, U> InstrumentedRepository<E, C, U>
where
    E: Entity,
    C: Send + 'static,
    U: Send + 'static,
{
    /// Wrap a repository
    pub fn new(inner: Arc<dyn EntityRepository<E, C, U>>) -> Self {
        Self {
            inner,
            counters: Counters::default(),
        }
    }

    /// Current counts
    pub fn counts(&self) -> StoreCallCounts {
        StoreCallCounts {
            creates: self.counters.creates.load(Ordering::SeqCst),
            loads: self.counters.loads.load(Ordering::SeqCst),
            updates: self.counters.updates.load(Ordering::SeqCst),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.counters.creates.store(0, Ordering::SeqCst);
        self.counters.loads.store(0, Ordering::SeqCst);
        self.counters.updates.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl<E, C, U> EntityRepository<E, C, U> for InstrumentedRepository<E, C, U>
where
    E: Entity,
    C: Send + 'static,
    U: Send + 'static,
{
    async fn create(&self, dto: C, tx: Option<&TransactionContext>) -> Result<E> {
        self.counters.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(dto, tx).await
    }

    async fn find_by_id(&self, id: &str, tx: Option<&TransactionContext>) -> Result<Option<E>> {
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id, tx).await
    }

    async fn update(
        &self,
        id: &str,
        patch: U,
        tx: Option<&TransactionContext>,
    ) -> Result<Option<E>> {
        self.counters.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, patch, tx).await
    }
}
