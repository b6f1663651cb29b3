//! Notification repository.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::instrument;

use super::models::Notification;

const NOTIFICATION_COLUMNS: &str = "id, user_id, kind, body, is_read, created_at";

/// Repository for user notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Deliver a notification to a user.
    #[instrument(skip(self, body))]
    pub async fn notify(&self, user_id: &str, kind: &str, body: &str) -> Result<Notification> {
        let id = nanoid::nanoid!();

        sqlx::query("INSERT INTO notifications (id, user_id, kind, body) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(user_id)
            .bind(kind)
            .bind(body)
            .execute(&self.pool)
            .await
            .context("failed to insert notification")?;

        let notification = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?"
        ))
        .bind(&id)
        .fetch_one(&self.pool)
        .await
        .context("failed to fetch notification after insert")?;

        Ok(notification)
    }

    /// A user's notifications, newest first, optionally unread only.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str, unread_only: bool) -> Result<Vec<Notification>> {
        let filter = if unread_only { "AND is_read = 0" } else { "" };
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE user_id = ? {filter} ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list notifications")?;

        Ok(notifications)
    }

    /// Mark one notification read. Scoped to the owner, so marking another
    /// user's notification reports not-found instead of leaking existence.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: &str, user_id: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .context("failed to mark notification read")?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a user's notifications read. Returns how many changed.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .context("failed to mark notifications read")?;

        Ok(result.rows_affected())
    }
}
