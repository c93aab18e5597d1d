//! User entity
//!
//! Account record for an end user of the consuming service. Field names are
//! serialized in camelCase so cached snapshots and stored documents share one
//! shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, FromCreate};

/// Stored user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier
    pub id: String,
    /// External user identifier
    pub user_id: String,
    /// Contact email
    pub email: String,
    /// Consumer the user belongs to
    pub consumer_id: String,
    /// Key issued to the user
    pub key_id: String,
    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    /// Last sign-in timestamp
    #[serde(default = "Utc::now")]
    pub signed_in: DateTime<Utc>,
    /// Flagged for cheating
    #[serde(default)]
    pub is_cheater: bool,
    /// Soft-delete marker
    #[serde(default)]
    pub deleted: bool,
}

impl Entity for User {
    const ENTITY_NAME: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for creating a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    /// External user identifier
    pub user_id: String,
    /// Contact email
    pub email: String,
    /// Consumer the user belongs to
    pub consumer_id: String,
    /// Key issued to the user
    pub key_id: String,
}

impl FromCreate<CreateUserDto> for User {
    fn from_create(id: String, dto: CreateUserDto) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: dto.user_id,
            email: dto.email,
            consumer_id: dto.consumer_id,
            key_id: dto.key_id,
            created: now,
            signed_in: now,
            is_cheater: false,
            deleted: false,
        }
    }
}

/// Partial update for a user; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    /// New contact email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New consumer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_id: Option<String>,
    /// New key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    /// New sign-in timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_in: Option<DateTime<Utc>>,
    /// New cheater flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_cheater: Option<bool>,
    /// New soft-delete marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl UpdateUserDto {
    /// Patch that only changes the email
    pub fn email<S: Into<String>>(email: S) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
