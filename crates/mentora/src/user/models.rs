//! User data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::roles;

/// User entity from database.
///
/// The role is stored as the same opaque label that ends up inside issued
/// tokens, so what the database holds is exactly what the authorizer compares.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub bio: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

impl User {
    /// Public view of the account, safe to return to any caller.
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            role: self.role.clone(),
            bio: self.bio.clone(),
        }
    }
}

/// Public user info.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub bio: Option<String>,
}

/// Fields required to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
}

/// Check that a label is one of the assignable roles.
pub fn is_valid_role(role: &str) -> bool {
    roles::ALL.contains(&role)
}
