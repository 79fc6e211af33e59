use chrono::{DateTime, Utc};
use models::status::UserStatus;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::permissions::{permission, Action, Resource};

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub password: String,
}

/// Domain user (business view) with the permissions of its role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role_id: i32,
    pub role: String,
    pub status: UserStatus,
    pub permissions: Vec<String>,
}

impl AuthUser {
    pub fn can(&self, resource: Resource, action: Action) -> bool {
        let wanted = permission(resource, action);
        self.permissions.iter().any(|p| *p == wanted)
    }
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: i32,
    pub password_hash: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: AuthUser,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT payload; `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}
