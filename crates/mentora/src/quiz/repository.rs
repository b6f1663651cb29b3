//! Quiz attempt repository.

use std::collections::HashMap;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::instrument;

use super::models::{QuestionResult, QuizAttempt};

const ATTEMPT_COLUMNS: &str = "id, user_id, chapter_id, score, total, answers, results, created_at";

/// Repository for quiz attempt persistence.
#[derive(Debug, Clone)]
pub struct QuizRepository {
    pool: SqlitePool,
}

impl QuizRepository {
    /// Create a new quiz repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a graded attempt, per-question results included.
    #[instrument(skip(self, answers, results))]
    pub async fn record_attempt(
        &self,
        user_id: &str,
        chapter_id: &str,
        score: i64,
        total: i64,
        answers: &HashMap<String, i64>,
        results: &[QuestionResult],
    ) -> Result<QuizAttempt> {
        let id = nanoid::nanoid!();
        let answers_json = serde_json::to_string(answers).context("failed to serialize answers")?;
        let results_json = serde_json::to_string(results).context("failed to serialize results")?;

        sqlx::query(
            r#"
            INSERT INTO quiz_attempts (id, user_id, chapter_id, score, total, answers, results)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(chapter_id)
        .bind(score)
        .bind(total)
        .bind(&answers_json)
        .bind(&results_json)
        .execute(&self.pool)
        .await
        .context("failed to insert quiz attempt")?;

        let attempt = sqlx::query_as::<_, QuizAttempt>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts WHERE id = ?"
        ))
        .bind(&id)
        .fetch_one(&self.pool)
        .await
        .context("failed to fetch attempt after insert")?;

        Ok(attempt)
    }

    /// Attempt history for a user, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<QuizAttempt>> {
        let attempts = sqlx::query_as::<_, QuizAttempt>(&format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list attempts")?;

        Ok(attempts)
    }
}
