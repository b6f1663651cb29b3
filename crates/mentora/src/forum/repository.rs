//! Forum repository for database operations.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::instrument;

use super::models::{ForumReply, ForumThread, ThreadSummary};

/// Repository for forum threads and replies.
#[derive(Debug, Clone)]
pub struct ForumRepository {
    pool: SqlitePool,
}

impl ForumRepository {
    /// Create a new forum repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a thread.
    #[instrument(skip(self, title, body))]
    pub async fn create_thread(
        &self,
        author_id: &str,
        title: &str,
        body: &str,
    ) -> Result<ForumThread> {
        let id = nanoid::nanoid!();

        sqlx::query("INSERT INTO forum_threads (id, author_id, title, body) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(author_id)
            .bind(title)
            .bind(body)
            .execute(&self.pool)
            .await
            .context("failed to insert thread")?;

        self.get_thread(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("thread not found after creation"))
    }

    /// Get a thread by ID.
    #[instrument(skip(self))]
    pub async fn get_thread(&self, id: &str) -> Result<Option<ForumThread>> {
        let thread = sqlx::query_as::<_, ForumThread>(
            "SELECT id, author_id, title, body, created_at FROM forum_threads WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch thread")?;

        Ok(thread)
    }

    /// All threads with reply counts, newest first.
    #[instrument(skip(self))]
    pub async fn list_threads(&self) -> Result<Vec<ThreadSummary>> {
        let threads = sqlx::query_as::<_, ThreadSummary>(
            r#"
            SELECT t.id, t.author_id, t.title, t.body, t.created_at,
                   (SELECT COUNT(*) FROM forum_replies r WHERE r.thread_id = t.id) AS reply_count
            FROM forum_threads t
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list threads")?;

        Ok(threads)
    }

    /// Delete a thread. Replies cascade.
    #[instrument(skip(self))]
    pub async fn delete_thread(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM forum_threads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to delete thread")?;

        Ok(result.rows_affected() > 0)
    }

    /// Add a reply to a thread.
    #[instrument(skip(self, body))]
    pub async fn create_reply(
        &self,
        thread_id: &str,
        author_id: &str,
        body: &str,
    ) -> Result<ForumReply> {
        let id = nanoid::nanoid!();

        sqlx::query(
            "INSERT INTO forum_replies (id, thread_id, author_id, body) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(thread_id)
        .bind(author_id)
        .bind(body)
        .execute(&self.pool)
        .await
        .context("failed to insert reply")?;

        let reply = sqlx::query_as::<_, ForumReply>(
            "SELECT id, thread_id, author_id, body, created_at FROM forum_replies WHERE id = ?",
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await
        .context("failed to fetch reply after insert")?;

        Ok(reply)
    }

    /// Replies for a thread, oldest first.
    #[instrument(skip(self))]
    pub async fn list_replies(&self, thread_id: &str) -> Result<Vec<ForumReply>> {
        let replies = sqlx::query_as::<_, ForumReply>(
            "SELECT id, thread_id, author_id, body, created_at \
             FROM forum_replies WHERE thread_id = ? \
             ORDER BY created_at, id",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list replies")?;

        Ok(replies)
    }

    /// Forum activity for one user: (threads, replies).
    #[instrument(skip(self))]
    pub async fn activity_for_user(&self, user_id: &str) -> Result<(i64, i64)> {
        let activity = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT (SELECT COUNT(*) FROM forum_threads WHERE author_id = ?),
                   (SELECT COUNT(*) FROM forum_replies WHERE author_id = ?)
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("failed to count forum activity")?;

        Ok(activity)
    }

    /// Total thread count, for the admin analytics view.
    #[instrument(skip(self))]
    pub async fn count_threads(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forum_threads")
            .fetch_one(&self.pool)
            .await
            .context("failed to count threads")?;

        Ok(count)
    }
}
