//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::license::NewLicense;

/// User entity
///
/// The password hash never serializes into a response body.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
    pub date_created: DateTime<Utc>,
    pub is_admin: bool,
}

/// Normalized registration payload, produced by the validation pipeline
///
/// A user is always created together with their license; the repository
/// writes both in one transaction.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub license: NewLicense,
}

/// Allow-listed partial-update payload for a user
///
/// `is_admin` is only ever populated by the validator for admin callers.
/// The password arrives in plaintext and is hashed by the repository.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

/// Login credentials, normalized from the login payload
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}
