use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::role::Role;
use super::timestamp;

/// Login account. Usernames are stored lower-cased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub employee_id: Option<String>,
    pub is_active: bool,
    #[serde(default, with = "timestamp::option")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

record!(User, "users", "User");

/// Issued refresh token, tracked by its `jti` so it can be rotated and revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    pub id: String,
    pub user_id: String,
    pub jti: String,
    #[serde(with = "timestamp")]
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

record!(RefreshToken, "refresh_tokens", "Refresh token");

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters"))]
    #[schema(example = "hr.manager")]
    pub username: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(example = "s3cret-pass")]
    pub password: String,
    /// 1 Admin, 2 HR, 3 Employee, 4 System, 5 API user
    #[schema(example = 3)]
    pub role_id: u8,
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Account as returned to clients; never carries the hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub employee_id: Option<String>,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            employee_id: u.employee_id,
            is_active: u.is_active,
        }
    }
}
