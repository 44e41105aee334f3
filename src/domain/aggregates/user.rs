//! Back-office users.
//!
//! Credentials are a plain username/password pair checked by the store; rows
//! read for listing never carry the password column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::value_objects::EntityId;

pub const DEFAULT_ROLE: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserPayload {
    #[validate(length(min = 1, max = 80))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, max = 80))]
    pub username: String,
    /// Left unchanged when absent or empty.
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: User,
    pub token: String,
}

impl LoginResponse {
    pub fn for_user(user: User) -> Self {
        let token = format!("simple-token-{}", user.id);
        Self { success: true, user, token }
    }
}

/// Role to store: the given one, or the default when blank.
pub fn role_or_default(role: Option<String>) -> String {
    role.map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_ROLE.to_string())
}
