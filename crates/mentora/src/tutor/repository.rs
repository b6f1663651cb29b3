//! Tutor conversation repository.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::instrument;

use super::models::{TutorConversation, TutorMessage};

/// Repository for tutor conversations and messages.
#[derive(Debug, Clone)]
pub struct TutorRepository {
    pool: SqlitePool,
}

impl TutorRepository {
    /// Create a new tutor repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Start a conversation for a user.
    #[instrument(skip(self, title))]
    pub async fn create_conversation(&self, user_id: &str, title: &str) -> Result<TutorConversation> {
        let id = nanoid::nanoid!();

        sqlx::query("INSERT INTO tutor_conversations (id, user_id, title) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(user_id)
            .bind(title)
            .execute(&self.pool)
            .await
            .context("failed to insert conversation")?;

        self.get_conversation(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("conversation not found after creation"))
    }

    /// Get a conversation by ID. Ownership is checked by the caller.
    #[instrument(skip(self))]
    pub async fn get_conversation(&self, id: &str) -> Result<Option<TutorConversation>> {
        let conversation = sqlx::query_as::<_, TutorConversation>(
            "SELECT id, user_id, title, created_at, updated_at \
             FROM tutor_conversations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch conversation")?;

        Ok(conversation)
    }

    /// Conversations for a user, most recently active first.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<TutorConversation>> {
        let conversations = sqlx::query_as::<_, TutorConversation>(
            "SELECT id, user_id, title, created_at, updated_at \
             FROM tutor_conversations WHERE user_id = ? \
             ORDER BY updated_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list conversations")?;

        Ok(conversations)
    }

    /// Delete a conversation owned by the user. Messages cascade.
    #[instrument(skip(self))]
    pub async fn delete_conversation(&self, id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tutor_conversations WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("failed to delete conversation")?;

        Ok(result.rows_affected() > 0)
    }

    /// Messages for a conversation, oldest first.
    #[instrument(skip(self))]
    pub async fn list_messages(&self, conversation_id: &str) -> Result<Vec<TutorMessage>> {
        let messages = sqlx::query_as::<_, TutorMessage>(
            "SELECT id, conversation_id, author, body, created_at \
             FROM tutor_messages WHERE conversation_id = ? \
             ORDER BY created_at, id",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list messages")?;

        Ok(messages)
    }

    /// Append a message and bump the conversation's activity timestamp.
    #[instrument(skip(self, body))]
    pub async fn append_message(
        &self,
        conversation_id: &str,
        author: &str,
        body: &str,
    ) -> Result<TutorMessage> {
        let id = nanoid::nanoid!();

        sqlx::query(
            "INSERT INTO tutor_messages (id, conversation_id, author, body) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(conversation_id)
        .bind(author)
        .bind(body)
        .execute(&self.pool)
        .await
        .context("failed to insert message")?;

        sqlx::query("UPDATE tutor_conversations SET updated_at = datetime('now') WHERE id = ?")
            .bind(conversation_id)
            .execute(&self.pool)
            .await
            .context("failed to touch conversation")?;

        let message = sqlx::query_as::<_, TutorMessage>(
            "SELECT id, conversation_id, author, body, created_at \
             FROM tutor_messages WHERE id = ?",
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await
        .context("failed to fetch message after insert")?;

        Ok(message)
    }

    /// Conversation count for a user, for the analytics summary.
    #[instrument(skip(self))]
    pub async fn count_for_user(&self, user_id: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tutor_conversations WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .context("failed to count conversations")?;

        Ok(count)
    }
}
