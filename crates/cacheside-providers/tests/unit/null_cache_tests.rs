//! Null cache provider contract

use cacheside_domain::ports::providers::cache::{CacheEntryConfig, CacheProvider};
use cacheside_providers::cache::NullCacheProvider;

#[tokio::test]
async fn test_null_cache_stores_nothing() {
    let cache = NullCacheProvider::new();

    cache.set_json("user:1", "{}", CacheEntryConfig::new()).await.unwrap();

    assert_eq!(cache.get_json("user:1").await.unwrap(), None);
    assert!(!cache.exists("user:1").await.unwrap());
    assert_eq!(cache.size().await.unwrap(), 0);
}

#[tokio::test]
async fn test_null_cache_locks_are_always_free() {
    let cache = NullCacheProvider::new();
    let config = CacheEntryConfig::new().with_ttl_secs(10);

    assert!(cache.set_if_absent("user:1:lock", "a", config.clone()).await.unwrap());
    assert!(cache.set_if_absent("user:1:lock", "b", config).await.unwrap());
    assert!(!cache.delete_if_equals("user:1:lock", "a").await.unwrap());
}
