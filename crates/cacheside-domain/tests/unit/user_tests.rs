//! User entity tests

use cacheside_domain::{CreateUserDto, Entity, FromCreate, UpdateUserDto, User};

fn sample_dto() -> CreateUserDto {
    CreateUserDto {
        user_id: "abc".to_string(),
        email: "abc@example.com".to_string(),
        consumer_id: "consumer-1".to_string(),
        key_id: "key-1".to_string(),
    }
}

#[test]
fn test_user_from_create_applies_defaults() {
    let user = User::from_create("65a1f0c2e4b0a1b2c3d4e5f6".to_string(), sample_dto());

    assert_eq!(user.id(), "65a1f0c2e4b0a1b2c3d4e5f6");
    assert_eq!(user.user_id, "abc");
    assert!(!user.is_cheater);
    assert!(!user.deleted);
    assert_eq!(user.created, user.signed_in);
    assert_eq!(User::ENTITY_NAME, "user");
}

#[test]
fn test_user_json_round_trip() {
    let user = User::from_create("65a1f0c2e4b0a1b2c3d4e5f6".to_string(), sample_dto());

    let json = serde_json::to_string(&user).unwrap();
    let decoded: User = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, user);
}

#[test]
fn test_user_json_uses_camel_case() {
    let user = User::from_create("65a1f0c2e4b0a1b2c3d4e5f6".to_string(), sample_dto());
    let value = serde_json::to_value(&user).unwrap();

    assert_eq!(value["userId"], "abc");
    assert_eq!(value["consumerId"], "consumer-1");
    assert_eq!(value["isCheater"], false);
}

#[test]
fn test_user_decodes_with_missing_defaults() {
    let json = r#"{
        "id": "65a1f0c2e4b0a1b2c3d4e5f6",
        "userId": "abc",
        "email": "abc@example.com",
        "consumerId": "c",
        "keyId": "k"
    }"#;

    let user: User = serde_json::from_str(json).unwrap();
    assert!(!user.deleted);
    assert!(!user.is_cheater);
}

#[test]
fn test_update_dto_serializes_only_present_fields() {
    let patch = UpdateUserDto::email("x@y.com");
    let value = serde_json::to_value(&patch).unwrap();

    assert_eq!(value, serde_json::json!({ "email": "x@y.com" }));
    assert!(!patch.is_empty());
    assert!(UpdateUserDto::default().is_empty());
}
