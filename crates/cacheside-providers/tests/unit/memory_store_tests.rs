//! Behaviour of the in-memory entity store

use cacheside_domain::error::Error;
use cacheside_domain::ports::repositories::EntityRepository;
use cacheside_domain::{CreateUserDto, UpdateUserDto, User};
use cacheside_providers::store::InMemoryEntityStore;
use chrono::{TimeZone, Utc};
use std::sync::Arc;

type UserStore = Arc<dyn EntityRepository<User, CreateUserDto, UpdateUserDto>>;

fn store() -> UserStore {
    Arc::new(InMemoryEntityStore::<User>::new())
}

fn create_dto(user_id: &str) -> CreateUserDto {
    CreateUserDto {
        user_id: user_id.to_string(),
        email: format!("{user_id}@example.com"),
        consumer_id: "consumer-1".to_string(),
        key_id: "key-1".to_string(),
    }
}

#[tokio::test]
async fn test_created_user_is_found_by_id() {
    let store = store();
    let created = store.create(create_dto("u1"), None).await.unwrap();

    let found = store.find_by_id(&created.id, None).await.unwrap();

    assert_eq!(found, Some(created));
}

#[tokio::test]
async fn test_ids_are_unique() {
    let store = store();
    let a = store.create(create_dto("a"), None).await.unwrap();
    let b = store.create(create_dto("b"), None).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.id.len(), 24);
}

#[tokio::test]
async fn test_missing_id_is_none() {
    let store = store();

    let found = store.find_by_id("ffffffffffffffffffffffff", None).await.unwrap();
    let updated = store
        .update("ffffffffffffffffffffffff", UpdateUserDto::email("x@y.z"), None)
        .await
        .unwrap();

    assert!(found.is_none());
    assert!(updated.is_none());
}

#[tokio::test]
async fn test_malformed_id_is_invalid_argument() {
    let store = store();

    let find = store.find_by_id("u1", None).await.unwrap_err();
    let update = store
        .update("u1", UpdateUserDto::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(find, Error::InvalidArgument { .. }));
    assert!(matches!(update, Error::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_partial_update_changes_only_present_fields() {
    let store = store();
    let created = store.create(create_dto("u1"), None).await.unwrap();
    let signed_in = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();

    let patch = UpdateUserDto {
        signed_in: Some(signed_in),
        is_cheater: Some(true),
        ..UpdateUserDto::default()
    };
    let updated = store
        .update(&created.id, patch, None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.signed_in, signed_in);
    assert!(updated.is_cheater);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.created, created.created);

    let reloaded = store.find_by_id(&created.id, None).await.unwrap();
    assert_eq!(reloaded, Some(updated));
}
