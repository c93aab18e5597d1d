//! Cache-aside behaviour of `EntityAccessService`

use std::sync::Arc;
use std::time::Duration;

use cacheside_application::{AccessPolicy, RetryPolicy, StoreCallCounts};
use cacheside_domain::error::Error;
use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider};
use cacheside_domain::{CacheKey, UpdateUserDto, User};
use cacheside_providers::cache::MokaCacheProvider;

use crate::support::{
    BrokenLocks, BrokenRepository, CacheCall, FailingCache, Harness, HeldLocks, RecordingCache,
    UserRepo, UserService, counting_store, create_dto, fast_policy,
};

fn user_key(id: &str) -> String {
    CacheKey::for_entity::<User>(id).as_str().to_string()
}

fn lock_key(id: &str) -> String {
    CacheKey::for_entity::<User>(id).lock_key()
}

// ============================================================================
// Read path
// ============================================================================

#[tokio::test]
async fn test_read_after_create_returns_created_entity() {
    let h = Harness::new(Duration::ZERO, fast_policy());

    let created = h.service.create(create_dto("u1")).await.unwrap();
    let found = h.service.find_one(&created.id).await.unwrap();

    assert_eq!(found, created);
}

#[tokio::test]
async fn test_create_does_not_populate_cache() {
    let h = Harness::new(Duration::ZERO, fast_policy());

    let created = h.service.create(create_dto("u1")).await.unwrap();

    assert!(!h.cache.exists(&user_key(&created.id)).await.unwrap());
}

#[tokio::test]
async fn test_second_read_is_served_from_cache() {
    let h = Harness::new(Duration::ZERO, fast_policy());
    let created = h.service.create(create_dto("u1")).await.unwrap();

    h.service.find_one(&created.id).await.unwrap();
    h.service.find_one(&created.id).await.unwrap();

    assert_eq!(h.store.counts().loads, 1);
}

#[tokio::test]
async fn test_single_cold_read_takes_and_frees_lock() {
    let cache = Arc::new(RecordingCache::default());
    let h = Harness::with_cache(Duration::ZERO, AccessPolicy::default(), cache.clone());
    let created = h.service.create(create_dto("u1")).await.unwrap();

    let found = h.service.find_one(&created.id).await.unwrap();

    assert_eq!(found, created);
    assert_eq!(
        cache.calls(),
        vec![
            CacheCall::Get(user_key(&created.id)),
            CacheCall::SetIfAbsent {
                key: lock_key(&created.id),
                ttl: Duration::from_secs(10),
            },
            CacheCall::Get(user_key(&created.id)),
            CacheCall::Set {
                key: user_key(&created.id),
                ttl: Duration::from_secs(3600),
            },
            CacheCall::DeleteIfEquals(lock_key(&created.id)),
        ]
    );
    assert!(!cache.exists(&lock_key(&created.id)).await.unwrap());
    assert_eq!(h.store.counts().loads, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_concurrent_cold_reads_load_once() {
    let h = Harness::new(Duration::from_millis(100), fast_policy());
    let created = h.service.create(create_dto("u1")).await.unwrap();

    let (a, b) = tokio::join!(
        h.service.find_one(&created.id),
        h.service.find_one(&created.id)
    );

    assert_eq!(a.unwrap(), created);
    assert_eq!(b.unwrap(), created);
    assert_eq!(h.store.counts().loads, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stampede_of_cold_reads_loads_once() {
    let h = Harness::new(Duration::from_millis(100), AccessPolicy::default());
    let created = h.service.create(create_dto("u1")).await.unwrap();

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let service = h.service.clone();
            let id = created.id.clone();
            tokio::spawn(async move { service.find_one(&id).await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), created);
    }
    assert_eq!(
        h.store.counts(),
        StoreCallCounts {
            creates: 1,
            loads: 1,
            updates: 0
        }
    );
}

#[tokio::test]
async fn test_missing_entity_is_not_found_and_frees_lock() {
    let h = Harness::new(Duration::ZERO, fast_policy());
    let id = "ffffffffffffffffffffffff";

    let err = h.service.find_one(id).await.unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "{err:?}");
    assert_eq!(err.status_code(), 404);
    assert!(!h.cache.exists(&lock_key(id)).await.unwrap());
    assert!(!h.cache.exists(&user_key(id)).await.unwrap());
}

#[tokio::test]
async fn test_empty_and_malformed_ids_are_invalid() {
    let h = Harness::new(Duration::ZERO, fast_policy());

    let empty = h.service.find_one("").await.unwrap_err();
    let malformed = h.service.find_one("not-a-hex-id").await.unwrap_err();

    assert!(matches!(empty, Error::InvalidArgument { .. }), "{empty:?}");
    assert!(matches!(malformed, Error::InvalidArgument { .. }), "{malformed:?}");
    assert_eq!(h.store.counts().loads, 1);
}

// ============================================================================
// Bounded retry
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_held_lock_gives_up_after_attempt_cap() {
    let policy = AccessPolicy {
        retry: RetryPolicy::fixed(Duration::from_millis(10), 5),
        ..AccessPolicy::default()
    };
    let store = counting_store(Duration::ZERO);
    let repo: Arc<UserRepo> = store.clone();
    let service = UserService::new(
        repo,
        Arc::new(MokaCacheProvider::new()),
        Arc::new(HeldLocks),
        policy,
    );

    let err = service.find_one("65a1f0c2e4b0a1b2c3d4e5f6").await.unwrap_err();

    match err {
        Error::LockContention {
            ref key,
            attempts,
            waited_ms,
        } => {
            assert_eq!(key, "user:65a1f0c2e4b0a1b2c3d4e5f6:lock");
            assert_eq!(attempts, 5);
            assert!(waited_ms <= 50, "waited {waited_ms}ms");
        }
        other => panic!("expected LockContention, got {other:?}"),
    }
    assert_eq!(err.status_code(), 503);
    assert_eq!(store.counts().loads, 0);
}

#[tokio::test(start_paused = true)]
async fn test_held_lock_gives_up_at_wait_deadline() {
    let policy = AccessPolicy {
        retry: RetryPolicy {
            max_attempts: 100,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(10),
            multiplier: 1.0,
            jitter: Duration::ZERO,
            max_wait: Duration::from_millis(35),
        },
        ..AccessPolicy::default()
    };
    let store = counting_store(Duration::ZERO);
    let repo: Arc<UserRepo> = store.clone();
    let service = UserService::new(
        repo,
        Arc::new(MokaCacheProvider::new()),
        Arc::new(HeldLocks),
        policy,
    );

    let started = tokio::time::Instant::now();
    let err = service.find_one("65a1f0c2e4b0a1b2c3d4e5f6").await.unwrap_err();

    assert!(matches!(err, Error::LockContention { attempts: 5, .. }), "{err:?}");
    assert!(started.elapsed() < Duration::from_millis(50));
}

// ============================================================================
// Write path
// ============================================================================

#[tokio::test]
async fn test_update_removes_cache_entry_and_next_read_sees_it() {
    let h = Harness::new(Duration::ZERO, fast_policy());
    let created = h.service.create(create_dto("u1")).await.unwrap();
    h.service.find_one(&created.id).await.unwrap();
    assert!(h.cache.exists(&user_key(&created.id)).await.unwrap());

    let updated = h
        .service
        .update(&created.id, UpdateUserDto::email("new@example.com"))
        .await
        .unwrap();

    assert_eq!(updated.email, "new@example.com");
    assert!(!h.cache.exists(&user_key(&created.id)).await.unwrap());

    let reread = h.service.find_one(&created.id).await.unwrap();
    assert_eq!(reread, updated);
    assert_eq!(h.store.counts().loads, 2);
}

#[tokio::test]
async fn test_update_over_stale_entry_then_read() {
    let h = Harness::new(Duration::ZERO, fast_policy());
    let created = h.service.create(create_dto("u1")).await.unwrap();

    let mut stale = created.clone();
    stale.email = "stale@example.com".to_string();
    h.cache
        .set_json(
            &user_key(&created.id),
            &serde_json::to_string(&stale).unwrap(),
            CacheEntryConfig::new(),
        )
        .await
        .unwrap();

    h.service
        .update(&created.id, UpdateUserDto::email("fresh@example.com"))
        .await
        .unwrap();
    let found = h.service.find_one(&created.id).await.unwrap();

    assert_eq!(found.email, "fresh@example.com");
    assert_eq!(h.store.counts().loads, 1);
}

#[tokio::test]
async fn test_update_of_missing_entity_is_not_found() {
    let h = Harness::new(Duration::ZERO, fast_policy());

    let err = h
        .service
        .update("ffffffffffffffffffffffff", UpdateUserDto::email("x@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn test_update_invalidates_even_when_store_fails() {
    let cache: Arc<dyn CacheProvider> = Arc::new(MokaCacheProvider::new());
    let id = "65a1f0c2e4b0a1b2c3d4e5f6";
    cache
        .set_json(&user_key(id), "{}", CacheEntryConfig::new())
        .await
        .unwrap();
    let service = UserService::with_cache_locks(
        Arc::new(BrokenRepository {
            panic_on_load: false,
        }),
        Arc::clone(&cache),
        fast_policy(),
    );

    let err = service
        .update(id, UpdateUserDto::email("x@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Internal { .. }), "{err:?}");
    assert!(!cache.exists(&user_key(id)).await.unwrap());
}

#[tokio::test]
async fn test_invalidate_drops_entry() {
    let h = Harness::new(Duration::ZERO, fast_policy());
    let created = h.service.create(create_dto("u1")).await.unwrap();
    h.service.find_one(&created.id).await.unwrap();

    assert!(h.service.invalidate(&created.id).await);
    assert!(!h.service.invalidate(&created.id).await);
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_cache_outage_falls_back_to_store() {
    let h = Harness::with_cache(Duration::ZERO, fast_policy(), Arc::new(FailingCache));
    let created = h.service.create(create_dto("u1")).await.unwrap();

    let first = h.service.find_one(&created.id).await.unwrap();
    let second = h.service.find_one(&created.id).await.unwrap();
    let updated = h
        .service
        .update(&created.id, UpdateUserDto::email("new@example.com"))
        .await
        .unwrap();

    assert_eq!(first, created);
    assert_eq!(second, created);
    assert_eq!(updated.email, "new@example.com");
    assert_eq!(h.store.counts().loads, 2);
}

#[tokio::test]
async fn test_lock_outage_loads_without_lock() {
    let cache: Arc<dyn CacheProvider> = Arc::new(MokaCacheProvider::new());
    let store = counting_store(Duration::ZERO);
    let repo: Arc<UserRepo> = store.clone();
    let service = UserService::new(repo, Arc::clone(&cache), Arc::new(BrokenLocks), fast_policy());
    let created = service.create(create_dto("u1")).await.unwrap();

    let found = service.find_one(&created.id).await.unwrap();

    assert_eq!(found, created);
    assert!(cache.exists(&user_key(&created.id)).await.unwrap());
}

#[tokio::test]
async fn test_store_failure_is_wrapped_as_internal() {
    let service = UserService::with_cache_locks(
        Arc::new(BrokenRepository {
            panic_on_load: false,
        }),
        Arc::new(MokaCacheProvider::new()),
        fast_policy(),
    );
    let id = "65a1f0c2e4b0a1b2c3d4e5f6";

    let err = service.find_one(id).await.unwrap_err();

    match &err {
        Error::Internal { message, source } => {
            assert!(message.contains("find_one failed for user:"), "{message}");
            assert!(source.is_some());
        }
        other => panic!("expected Internal, got {other:?}"),
    }
    assert_eq!(err.status_code(), 500);

    let create_err = service.create(create_dto("u1")).await.unwrap_err();
    assert!(matches!(create_err, Error::Internal { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_load_still_frees_lock() {
    let cache: Arc<dyn CacheProvider> = Arc::new(MokaCacheProvider::new());
    let service = UserService::with_cache_locks(
        Arc::new(BrokenRepository {
            panic_on_load: true,
        }),
        Arc::clone(&cache),
        fast_policy(),
    );
    let id = "65a1f0c2e4b0a1b2c3d4e5f6";

    let task = {
        let service = service.clone();
        tokio::spawn(async move { service.find_one(id).await })
    };
    let joined = task.await;

    assert!(joined.unwrap_err().is_panic());
    assert!(!cache.exists(&lock_key(id)).await.unwrap());
}

#[tokio::test]
async fn test_cancelled_read_frees_lock_for_next_reader() {
    let h = Harness::new(Duration::from_millis(300), fast_policy());
    let created = h.service.create(create_dto("u1")).await.unwrap();

    let cancelled =
        tokio::time::timeout(Duration::from_millis(50), h.service.find_one(&created.id)).await;
    assert!(cancelled.is_err());

    // Background release runs on the runtime
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!h.cache.exists(&lock_key(&created.id)).await.unwrap());

    let found = h.service.find_one(&created.id).await.unwrap();
    assert_eq!(found, created);
}
