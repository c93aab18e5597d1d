//! Entity Access Service Use Case
//!
//! Cache-aside reads with a per-entity stampede lock, and writes that
//! invalidate the cached snapshot before returning.
//!
//! ```text
//! find_one(id)
//!   ├─ cache hit ──────────────────────────────► entity
//!   ├─ lock acquired ─► re-check cache ─► load ─► populate ─► release ─► entity
//!   ├─ lock held ─────► backoff ─► back to cache check (bounded)
//!   └─ lock backend down ─► load without lock
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use cacheside_domain::constants::{DEFAULT_DATA_TTL_SECS, DEFAULT_LOCK_TTL_SECS};
use cacheside_domain::entities::Entity;
use cacheside_domain::error::{Error, Result};
use cacheside_domain::ports::infrastructure::lock::{LockGuard, LockProvider};
use cacheside_domain::ports::providers::cache::CacheProvider;
use cacheside_domain::ports::repositories::EntityRepository;
use cacheside_domain::value_objects::{CacheKey, TransactionContext};
use futures::FutureExt;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache_store::CacheStore;
use crate::lock::CacheLockProvider;
use crate::retry::RetryPolicy;

/// TTLs and backoff used by [`EntityAccessService`]
#[derive(Debug, Clone, PartialEq)]
pub struct AccessPolicy {
    /// Lifetime of a cached snapshot
    pub data_ttl: Duration,
    /// Lifetime of a stampede lock
    pub lock_ttl: Duration,
    /// Backoff for callers that find the lock held
    pub retry: RetryPolicy,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            data_ttl: Duration::from_secs(DEFAULT_DATA_TTL_SECS),
            lock_ttl: Duration::from_secs(DEFAULT_LOCK_TTL_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

/// Cache-aside access to one entity type
///
/// Holds only shared handles; every call is independent.
pub struct EntityAccessService<E, C, U>
where
    E: Entity,
    C: Send + 'static,
    U: Send + 'static,
{
    repository: Arc<dyn EntityRepository<E, C, U>>,
    cache: CacheStore,
    locks: Arc<dyn LockProvider>,
    policy: AccessPolicy,
    _entity: PhantomData<fn() -> E>,
}

impl<E, C, U> Clone for EntityAccessService<E, C, U>
where
    E: Entity,
    C: Send + 'static,
    U: Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: self.cache.clone(),
            locks: Arc::clone(&self.locks),
            policy: self.policy.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, C, U> fmt::Debug for EntityAccessService<E, C, U>
where
    E: Entity,
    C: Send + 'static,
    U: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityAccessService")
            .field("entity", &E::ENTITY_NAME)
            .field("cache", &self.cache)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<E, C, U> EntityAccessService<E, C, U>
where
    E: Entity,
    C: Send + 'static,
    U: Send + 'static,
{
    /// Create a service from its collaborators
    pub fn new(
        repository: Arc<dyn EntityRepository<E, C, U>>,
        cache: Arc<dyn CacheProvider>,
        locks: Arc<dyn LockProvider>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            repository,
            cache: CacheStore::new(cache),
            locks,
            policy,
            _entity: PhantomData,
        }
    }

    /// Create a service whose locks live in the same cache backend
    pub fn with_cache_locks(
        repository: Arc<dyn EntityRepository<E, C, U>>,
        cache: Arc<dyn CacheProvider>,
        policy: AccessPolicy,
    ) -> Self {
        let locks = Arc::new(CacheLockProvider::new(Arc::clone(&cache)));
        Self::new(repository, cache, locks, policy)
    }

    /// Active policy
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Cache facade used by this service
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Read an entity, serving from cache when possible
    ///
    /// # Errors
    ///
    /// `NotFound` when the store has no such entity, `InvalidArgument` for an
    /// empty or malformed id, `LockContention` when another loader held the
    /// lock past the retry budget. Anything else is `Internal`.
    pub async fn find_one(&self, id: &str) -> Result<E> {
        let key = CacheKey::for_entity::<E>(id);
        self.read_through(id, &key)
            .await
            .map_err(|error| error.classify("find_one", key.as_str()))
    }

    /// Create an entity outside an explicit transaction
    pub async fn create(&self, dto: C) -> Result<E> {
        self.create_in(dto, None).await
    }

    /// Create an entity, threading an optional transaction context
    ///
    /// The cache is not populated; the first read loads the entity.
    pub async fn create_in(&self, dto: C, tx: Option<&TransactionContext>) -> Result<E> {
        let result = async {
            let entity = self.repository.create(dto, tx).await?;
            if entity.id().is_empty() {
                return Err(Error::internal(format!(
                    "store returned a {} without an id",
                    E::ENTITY_NAME
                )));
            }
            info!(entity = E::ENTITY_NAME, id = entity.id(), "Entity created");
            Ok::<_, Error>(entity)
        }
        .await;
        result.map_err(|error| error.classify("create", E::ENTITY_NAME))
    }

    /// Update an entity outside an explicit transaction
    pub async fn update(&self, id: &str, patch: U) -> Result<E> {
        self.update_in(id, patch, None).await
    }

    /// Apply a partial update, threading an optional transaction context
    ///
    /// The cached snapshot is deleted once the store call returns, whether
    /// it succeeded or not. A failed delete is logged and does not fail the
    /// update.
    pub async fn update_in(
        &self,
        id: &str,
        patch: U,
        tx: Option<&TransactionContext>,
    ) -> Result<E> {
        let key = CacheKey::for_entity::<E>(id);
        let result = async {
            require_id(id)?;
            let updated = self.repository.update(id, patch, tx).await;
            self.cache.invalidate(&key).await;
            let entity = updated?.ok_or_else(|| not_found::<E>(id))?;
            info!(key = %key, "Entity updated, cache invalidated");
            Ok::<_, Error>(entity)
        }
        .await;
        result.map_err(|error| error.classify("update", key.as_str()))
    }

    /// Drop the cached snapshot of an entity
    ///
    /// For callers that commit a transaction after `update_in` and want the
    /// committed state to be the next thing loaded.
    pub async fn invalidate(&self, id: &str) -> bool {
        self.cache.invalidate(&CacheKey::for_entity::<E>(id)).await
    }

    async fn read_through(&self, id: &str, key: &CacheKey) -> Result<E> {
        require_id(id)?;
        let lock_key = key.lock_key();
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            if let Some(entity) = self.cache.get::<E>(key).await {
                debug!(key = %key, "Cache hit");
                return Ok(entity);
            }

            attempt += 1;
            match self.locks.try_acquire(&lock_key, self.policy.lock_ttl).await {
                Ok(Some(guard)) => {
                    debug!(key = %key, attempt = attempt, "Cache miss, loading under lock");
                    return self.load_locked(id, key, guard).await;
                }
                Ok(None) => {
                    let elapsed = started.elapsed();
                    let Some(delay) = self.policy.retry.next_delay(attempt, elapsed) else {
                        let waited_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                        warn!(
                            key = %lock_key,
                            attempts = attempt,
                            waited_ms = waited_ms,
                            "Gave up waiting for lock"
                        );
                        return Err(Error::lock_contention(lock_key, attempt, waited_ms));
                    };
                    debug!(key = %lock_key, attempt = attempt, delay = ?delay, "Lock held, backing off");
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    warn!(
                        key = %lock_key,
                        error = %error,
                        "Lock backend failed, loading without lock"
                    );
                    return self.load_and_populate(id, key).await;
                }
            }
        }
    }

    /// Load while holding `guard`; the lock is released on every exit path
    ///
    /// Completion and panics release inline. If the future is dropped
    /// mid-load, [`HeldLock`] hands the release to the runtime.
    async fn load_locked(&self, id: &str, key: &CacheKey, guard: LockGuard) -> Result<E> {
        let mut held = HeldLock::new(Arc::clone(&self.locks), guard);
        let outcome = AssertUnwindSafe(async {
            // A previous holder may have populated the entry between our
            // cache check and the acquire.
            if let Some(entity) = self.cache.get::<E>(key).await {
                return Ok(entity);
            }
            self.load_and_populate(id, key).await
        })
        .catch_unwind()
        .await;

        if let Some(guard) = held.disarm() {
            self.release(guard).await;
        }

        match outcome {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    async fn load_and_populate(&self, id: &str, key: &CacheKey) -> Result<E> {
        let entity = self
            .repository
            .find_by_id(id, None)
            .await?
            .ok_or_else(|| not_found::<E>(id))?;
        self.cache.set(key, &entity, self.policy.data_ttl).await;
        Ok(entity)
    }

    async fn release(&self, guard: LockGuard) {
        let key = guard.key.clone();
        if let Err(error) = self.locks.release(guard).await {
            warn!(key = %key, error = %error, "Lock release failed, it will expire after its TTL");
        }
    }
}

/// Stampede lock that is released in the background if dropped while armed
struct HeldLock {
    locks: Arc<dyn LockProvider>,
    guard: Option<LockGuard>,
}

impl HeldLock {
    fn new(locks: Arc<dyn LockProvider>, guard: LockGuard) -> Self {
        Self {
            locks,
            guard: Some(guard),
        }
    }

    /// Take the guard back for an inline release
    fn disarm(&mut self) -> Option<LockGuard> {
        self.guard.take()
    }
}

impl Drop for HeldLock {
    fn drop(&mut self) {
        let Some(guard) = self.guard.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!(key = %guard.key, "Load cancelled, releasing lock in background");
                let locks = Arc::clone(&self.locks);
                handle.spawn(async move {
                    let key = guard.key.clone();
                    if let Err(error) = locks.release(guard).await {
                        warn!(key = %key, error = %error, "Lock release failed, it will expire after its TTL");
                    }
                });
            }
            Err(_) => {
                warn!(key = %guard.key, "No runtime to release cancelled lock, it will expire after its TTL");
            }
        }
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::invalid_argument("id must not be empty"));
    }
    Ok(())
}

fn not_found<E: Entity>(id: &str) -> Error {
    Error::not_found(format!("{} {id}", E::ENTITY_NAME))
}
