use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::constants::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use crate::domain::password::validate_password_length;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Admin
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub reset_password_token: Option<String>,
    pub reset_password_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug)]
pub struct UserInsert {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Identity attached to a request by the auth middleware, and the user shape returned to clients.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        AuthenticatedUser {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

// ───── Requests ─────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginUser {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginUser {
    /// Either field may carry a username or an email address.
    pub fn identifier(&self) -> Option<&str> {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(custom(function = "validate_password_length"))]
    pub password: String,

    #[serde(default)]
    pub role: UserRole,
}

impl NewUser {
    pub fn prepare_for_insert(&self, password_hash: String) -> UserInsert {
        UserInsert {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password_hash,
            role: self.role,
        }
    }
}

/// Body of the first-run bootstrap; every field falls back to a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitAdminRequest {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl InitAdminRequest {
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            username: self.username.unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
            email: self.email.unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            password: self.password.unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            role: UserRole::Admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    #[serde(default)]
    #[validate(custom(function = "validate_password_length"))]
    pub password: String,
}
