//! Shared test doubles for the application tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cacheside_application::{AccessPolicy, EntityAccessService, InstrumentedRepository, RetryPolicy};
use cacheside_domain::error::{Error, Result};
use cacheside_domain::ports::infrastructure::lock::{LockGuard, LockProvider};
use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider, CacheStats};
use cacheside_domain::ports::repositories::{EntityRepository, TransactionManager};
use cacheside_domain::{CreateUserDto, TransactionContext, UpdateUserDto, User};
use cacheside_providers::cache::MokaCacheProvider;
use cacheside_providers::store::InMemoryEntityStore;

pub type UserService = EntityAccessService<User, CreateUserDto, UpdateUserDto>;
pub type UserRepo = dyn EntityRepository<User, CreateUserDto, UpdateUserDto>;
pub type CountingRepo = InstrumentedRepository<User, CreateUserDto, UpdateUserDto>;

pub fn create_dto(user_id: &str) -> CreateUserDto {
    CreateUserDto {
        user_id: user_id.to_string(),
        email: format!("{user_id}@example.com"),
        consumer_id: "consumer-1".to_string(),
        key_id: "key-1".to_string(),
    }
}

/// Short fixed backoff so contention tests finish quickly
pub fn fast_policy() -> AccessPolicy {
    AccessPolicy {
        retry: RetryPolicy::fixed(Duration::from_millis(10), 500),
        ..AccessPolicy::default()
    }
}

/// Memory store wrapped in a call counter, optionally slowed down
pub fn counting_store(load_delay: Duration) -> Arc<CountingRepo> {
    let store: Arc<UserRepo> = Arc::new(InMemoryEntityStore::<User>::new());
    let slow: Arc<UserRepo> = Arc::new(SlowRepository {
        inner: store,
        load_delay,
    });
    Arc::new(InstrumentedRepository::new(slow))
}

/// Service over a counting memory store and a moka cache
pub struct Harness {
    pub service: UserService,
    pub store: Arc<CountingRepo>,
    pub cache: Arc<dyn CacheProvider>,
}

impl Harness {
    pub fn new(load_delay: Duration, policy: AccessPolicy) -> Self {
        Self::with_cache(load_delay, policy, Arc::new(MokaCacheProvider::new()))
    }

    pub fn with_cache(
        load_delay: Duration,
        policy: AccessPolicy,
        cache: Arc<dyn CacheProvider>,
    ) -> Self {
        let store = counting_store(load_delay);
        let repo: Arc<UserRepo> = store.clone();
        let service = UserService::with_cache_locks(repo, Arc::clone(&cache), policy);
        Self {
            service,
            store,
            cache,
        }
    }
}

/// Delays every `find_by_id` before delegating
pub struct SlowRepository {
    pub inner: Arc<UserRepo>,
    pub load_delay: Duration,
}

#[async_trait]
impl EntityRepository<User, CreateUserDto, UpdateUserDto> for SlowRepository {
    async fn create(&self, dto: CreateUserDto, tx: Option<&TransactionContext>) -> Result<User> {
        self.inner.create(dto, tx).await
    }

    async fn find_by_id(&self, id: &str, tx: Option<&TransactionContext>) -> Result<Option<User>> {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        self.inner.find_by_id(id, tx).await
    }

    async fn update(
        &self,
        id: &str,
        patch: UpdateUserDto,
        tx: Option<&TransactionContext>,
    ) -> Result<Option<User>> {
        self.inner.update(id, patch, tx).await
    }
}

/// Repository whose reads fail with a database error or panic
pub struct BrokenRepository {
    pub panic_on_load: bool,
}

#[async_trait]
impl EntityRepository<User, CreateUserDto, UpdateUserDto> for BrokenRepository {
    async fn create(&self, _dto: CreateUserDto, _tx: Option<&TransactionContext>) -> Result<User> {
        Err(Error::database("connection reset"))
    }

    async fn find_by_id(&self, _id: &str, _tx: Option<&TransactionContext>) -> Result<Option<User>> {
        if self.panic_on_load {
            panic!("store driver bug");
        }
        Err(Error::database("connection reset"))
    }

    async fn update(
        &self,
        _id: &str,
        _patch: UpdateUserDto,
        _tx: Option<&TransactionContext>,
    ) -> Result<Option<User>> {
        Err(Error::database("connection reset"))
    }
}

/// Cache backend that fails every call
#[derive(Debug)]
pub struct FailingCache;

#[async_trait]
impl CacheProvider for FailingCache {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::cache("backend down"))
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        Err(Error::cache("backend down"))
    }

    async fn set_if_absent(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<bool> {
        Err(Error::cache("backend down"))
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Err(Error::cache("backend down"))
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        Err(Error::cache("backend down"))
    }

    async fn clear(&self) -> Result<()> {
        Err(Error::cache("backend down"))
    }

    async fn stats(&self) -> Result<CacheStats> {
        Err(Error::cache("backend down"))
    }

    async fn size(&self) -> Result<usize> {
        Err(Error::cache("backend down"))
    }

    fn provider_name(&self) -> &str {
        "failing"
    }
}

/// One call observed by [`RecordingCache`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheCall {
    Get(String),
    Set { key: String, ttl: Duration },
    SetIfAbsent { key: String, ttl: Duration },
    Delete(String),
    DeleteIfEquals(String),
}

/// Moka cache that records every call made to it
#[derive(Debug, Default)]
pub struct RecordingCache {
    inner: MokaCacheProvider,
    calls: Mutex<Vec<CacheCall>>,
}

impl RecordingCache {
    pub fn calls(&self) -> Vec<CacheCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: CacheCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CacheProvider for RecordingCache {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        self.record(CacheCall::Get(key.to_string()));
        self.inner.get_json(key).await
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        self.record(CacheCall::Set {
            key: key.to_string(),
            ttl: config.effective_ttl(),
        });
        self.inner.set_json(key, value, config).await
    }

    async fn set_if_absent(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<bool> {
        self.record(CacheCall::SetIfAbsent {
            key: key.to_string(),
            ttl: config.effective_ttl(),
        });
        self.inner.set_if_absent(key, value, config).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.record(CacheCall::Delete(key.to_string()));
        self.inner.delete(key).await
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        self.record(CacheCall::DeleteIfEquals(key.to_string()));
        self.inner.delete_if_equals(key, expected).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key).await
    }

    async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }

    async fn stats(&self) -> Result<CacheStats> {
        self.inner.stats().await
    }

    async fn size(&self) -> Result<usize> {
        self.inner.size().await
    }

    fn provider_name(&self) -> &str {
        "recording"
    }
}

/// Lock provider whose lock is always held by someone else
pub struct HeldLocks;

#[async_trait]
impl LockProvider for HeldLocks {
    async fn try_acquire(&self, _key: &str, _ttl: Duration) -> Result<Option<LockGuard>> {
        Ok(None)
    }

    async fn release(&self, _guard: LockGuard) -> Result<()> {
        Ok(())
    }
}

/// Lock provider whose backend is unreachable
pub struct BrokenLocks;

#[async_trait]
impl LockProvider for BrokenLocks {
    async fn try_acquire(&self, _key: &str, _ttl: Duration) -> Result<Option<LockGuard>> {
        Err(Error::cache("lock backend down"))
    }

    async fn release(&self, _guard: LockGuard) -> Result<()> {
        Err(Error::cache("lock backend down"))
    }
}

/// Transaction manager recording begin/commit/abort
#[derive(Default)]
pub struct RecordingTransactions {
    pub events: Mutex<Vec<String>>,
    pub fail_abort: bool,
}

impl RecordingTransactions {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionManager for RecordingTransactions {
    async fn begin(&self) -> Result<TransactionContext> {
        self.events.lock().unwrap().push("begin".to_string());
        Ok(TransactionContext::new("tx-1", ()))
    }

    async fn commit(&self, ctx: TransactionContext) -> Result<()> {
        self.events.lock().unwrap().push(format!("commit {}", ctx.id()));
        Ok(())
    }

    async fn abort(&self, ctx: TransactionContext) -> Result<()> {
        self.events.lock().unwrap().push(format!("abort {}", ctx.id()));
        if self.fail_abort {
            return Err(Error::database("abort failed"));
        }
        Ok(())
    }
}
