//! Content repository for database operations.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::instrument;

use super::models::{Chapter, Question, Subject};

/// Repository for subjects, chapters, and questions.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    pool: SqlitePool,
}

impl ContentRepository {
    /// Create a new content repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // --- subjects ---

    #[instrument(skip(self, description))]
    pub async fn create_subject(&self, title: &str, description: Option<&str>) -> Result<Subject> {
        let id = nanoid::nanoid!();

        sqlx::query("INSERT INTO subjects (id, title, description) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(title)
            .bind(description)
            .execute(&self.pool)
            .await
            .context("failed to insert subject")?;

        self.get_subject(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("subject not found after creation"))
    }

    #[instrument(skip(self))]
    pub async fn get_subject(&self, id: &str) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            "SELECT id, title, description, created_at FROM subjects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch subject")?;

        Ok(subject)
    }

    #[instrument(skip(self))]
    pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT id, title, description, created_at FROM subjects ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list subjects")?;

        Ok(subjects)
    }

    #[instrument(skip(self, title, description))]
    pub async fn update_subject(
        &self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE subjects
            SET title = COALESCE(?, title),
                description = COALESCE(?, description)
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to update subject")?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    pub async fn delete_subject(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to delete subject")?;

        Ok(result.rows_affected() > 0)
    }

    // --- chapters ---

    #[instrument(skip(self, body))]
    pub async fn create_chapter(
        &self,
        subject_id: &str,
        title: &str,
        body: Option<&str>,
        position: i64,
    ) -> Result<Chapter> {
        let id = nanoid::nanoid!();

        sqlx::query(
            "INSERT INTO chapters (id, subject_id, title, body, position) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(subject_id)
        .bind(title)
        .bind(body)
        .bind(position)
        .execute(&self.pool)
        .await
        .context("failed to insert chapter")?;

        self.get_chapter(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("chapter not found after creation"))
    }

    #[instrument(skip(self))]
    pub async fn get_chapter(&self, id: &str) -> Result<Option<Chapter>> {
        let chapter = sqlx::query_as::<_, Chapter>(
            "SELECT id, subject_id, title, body, position, created_at FROM chapters WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch chapter")?;

        Ok(chapter)
    }

    #[instrument(skip(self))]
    pub async fn list_chapters(&self, subject_id: &str) -> Result<Vec<Chapter>> {
        let chapters = sqlx::query_as::<_, Chapter>(
            r#"
            SELECT id, subject_id, title, body, position, created_at
            FROM chapters
            WHERE subject_id = ?
            ORDER BY position, created_at
            "#,
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list chapters")?;

        Ok(chapters)
    }

    #[instrument(skip(self, title, body))]
    pub async fn update_chapter(
        &self,
        id: &str,
        title: Option<&str>,
        body: Option<&str>,
        position: Option<i64>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE chapters
            SET title = COALESCE(?, title),
                body = COALESCE(?, body),
                position = COALESCE(?, position)
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(position)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to update chapter")?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    pub async fn delete_chapter(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to delete chapter")?;

        Ok(result.rows_affected() > 0)
    }

    // --- questions ---

    #[instrument(skip(self, prompt, options, explanation))]
    pub async fn create_question(
        &self,
        chapter_id: &str,
        prompt: &str,
        options: &[String],
        correct_index: i64,
        explanation: Option<&str>,
    ) -> Result<Question> {
        let id = nanoid::nanoid!();
        let options_json =
            serde_json::to_string(options).context("failed to serialize question options")?;

        sqlx::query(
            r#"
            INSERT INTO questions (id, chapter_id, prompt, options, correct_index, explanation)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(chapter_id)
        .bind(prompt)
        .bind(&options_json)
        .bind(correct_index)
        .bind(explanation)
        .execute(&self.pool)
        .await
        .context("failed to insert question")?;

        self.get_question(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("question not found after creation"))
    }

    #[instrument(skip(self))]
    pub async fn get_question(&self, id: &str) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, chapter_id, prompt, options, correct_index, explanation, created_at
            FROM questions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch question")?;

        Ok(question)
    }

    #[instrument(skip(self))]
    pub async fn list_questions(&self, chapter_id: &str) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, chapter_id, prompt, options, correct_index, explanation, created_at
            FROM questions
            WHERE chapter_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(chapter_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list questions")?;

        Ok(questions)
    }

    #[instrument(skip(self))]
    pub async fn delete_question(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to delete question")?;

        Ok(result.rows_affected() > 0)
    }

    /// Content totals for the admin analytics view.
    #[instrument(skip(self))]
    pub async fn counts(&self) -> Result<(i64, i64, i64)> {
        let counts = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT (SELECT COUNT(*) FROM subjects),
                   (SELECT COUNT(*) FROM chapters),
                   (SELECT COUNT(*) FROM questions)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("failed to count content")?;

        Ok(counts)
    }
}
