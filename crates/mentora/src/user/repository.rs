//! User repository for database operations.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::{NewUser, User, UserInfo};
use crate::auth::roles;

const USER_COLUMNS: &str = "id, username, email, password_hash, display_name, role, bio, \
                            is_active, created_at, updated_at, last_login_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn normalize_id_base(input: &str) -> String {
        let mut s = input.trim().to_lowercase();
        s = s
            .chars()
            .map(|c| match c {
                'a'..='z' | '0'..='9' | '_' | '-' => c,
                _ => '-',
            })
            .collect();
        s = s.trim_matches('-').to_string();
        if s.is_empty() {
            s = "user".to_string();
        }
        if s.len() > 24 {
            s.truncate(24);
        }
        s
    }

    /// Generate a unique user ID from a username.
    /// Always includes a random suffix to guarantee uniqueness without DB lookup.
    pub fn generate_user_id(username: &str) -> String {
        let base = Self::normalize_id_base(username);
        format!("{}-{}", base, nanoid::nanoid!(6))
    }

    /// Create a new user.
    ///
    /// Returns `None` when the username or email is already taken; the unique
    /// constraints settle the race between two concurrent registrations.
    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    pub async fn create(&self, new_user: NewUser) -> Result<Option<User>> {
        let id = Self::generate_user_id(&new_user.username);

        debug!("creating user {} ({})", new_user.username, id);

        let insert = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, display_name, role)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.display_name)
        .bind(&new_user.role)
        .execute(&self.pool)
        .await;

        match insert {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Ok(None);
            }
            Err(e) => return Err(e).context("failed to insert user"),
        }

        let user = self
            .get(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user not found after creation"))?;

        Ok(Some(user))
    }

    /// Get a user by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch user")?;

        Ok(user)
    }

    /// Get a user by username.
    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch user by username")?;

        Ok(user)
    }

    /// Get a user by email.
    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch user by email")?;

        Ok(user)
    }

    /// List all users, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list users")?;

        Ok(users)
    }

    /// List active mentor profiles.
    #[instrument(skip(self))]
    pub async fn list_mentors(&self) -> Result<Vec<UserInfo>> {
        let mentors = sqlx::query_as::<_, UserInfo>(
            r#"
            SELECT id, username, display_name, role, bio
            FROM users
            WHERE role = ? AND is_active = 1
            ORDER BY display_name, id
            "#,
        )
        .bind(roles::MENTOR)
        .fetch_all(&self.pool)
        .await
        .context("failed to list mentors")?;

        Ok(mentors)
    }

    /// Change a user's role. Returns false when the user does not exist.
    #[instrument(skip(self))]
    pub async fn update_role(&self, id: &str, role: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET role = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(role)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to update user role")?;

        Ok(result.rows_affected() > 0)
    }

    /// Update profile fields. `None` leaves the stored value untouched.
    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        id: &str,
        display_name: Option<&str>,
        bio: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET display_name = COALESCE(?, display_name),
                bio = COALESCE(?, bio),
                updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(display_name)
        .bind(bio)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to update user profile")?;

        Ok(result.rows_affected() > 0)
    }

    /// Activate or deactivate an account.
    #[instrument(skip(self))]
    pub async fn set_active(&self, id: &str, active: bool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_active = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(active)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to update user active state")?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login.
    #[instrument(skip(self))]
    pub async fn touch_last_login(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = datetime('now') WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to record login time")?;

        Ok(())
    }

    /// Delete a user.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to delete user")?;

        Ok(result.rows_affected() > 0)
    }

    /// Count users grouped by role.
    #[instrument(skip(self))]
    pub async fn count_by_role(&self) -> Result<Vec<(String, i64)>> {
        let counts = sqlx::query_as::<_, (String, i64)>(
            "SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to count users by role")?;

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_user_id_normalizes() {
        let id = UserRepository::generate_user_id("  Alice Smith!  ");
        let (base, suffix) = id.rsplit_once('-').unwrap();
        assert_eq!(base, "alice-smith");
        assert_eq!(suffix.len(), 6);
    }

    #[test]
    fn test_generate_user_id_empty_input() {
        let id = UserRepository::generate_user_id("!!!");
        assert!(id.starts_with("user-"));
    }

    #[test]
    fn test_generate_user_id_unique() {
        let a = UserRepository::generate_user_id("bob");
        let b = UserRepository::generate_user_id("bob");
        assert_ne!(a, b);
    }
}
