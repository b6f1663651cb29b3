//! Leaderboard and usage analytics, computed from quiz attempts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::instrument;

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: String,
    pub display_name: String,
    pub total_score: i64,
    pub attempts: i64,
    pub average_score: f64,
}

#[derive(Debug, Clone, FromRow)]
struct LeaderboardRow {
    user_id: String,
    display_name: String,
    total_score: i64,
    attempts: i64,
    average_score: f64,
}

/// Quiz aggregates for one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizSummary {
    pub attempts: i64,
    pub total_score: i64,
    pub average_score: f64,
    pub best_score: i64,
}

/// Platform-wide quiz totals.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizTotals {
    pub attempts: i64,
    pub average_score: f64,
}

/// Repository for aggregate queries over quiz attempts.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    /// Create a new analytics repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Top users by total quiz score.
    ///
    /// Ties break by attempt count (fewer attempts ranks higher), then by
    /// user id for a stable order.
    #[instrument(skip(self))]
    pub async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, LeaderboardRow>(
            r#"
            SELECT a.user_id,
                   u.display_name,
                   SUM(a.score) AS total_score,
                   COUNT(*) AS attempts,
                   AVG(CAST(a.score AS REAL)) AS average_score
            FROM quiz_attempts a
            JOIN users u ON u.id = a.user_id
            WHERE u.is_active = 1
            GROUP BY a.user_id, u.display_name
            ORDER BY total_score DESC, attempts ASC, a.user_id
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("failed to compute leaderboard")?;

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| LeaderboardEntry {
                rank: i as i64 + 1,
                user_id: row.user_id,
                display_name: row.display_name,
                total_score: row.total_score,
                attempts: row.attempts,
                average_score: row.average_score,
            })
            .collect();

        Ok(entries)
    }

    /// Quiz aggregates for one user.
    #[instrument(skip(self))]
    pub async fn quiz_summary_for_user(&self, user_id: &str) -> Result<QuizSummary> {
        let summary = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT COUNT(*) AS attempts,
                   COALESCE(SUM(score), 0) AS total_score,
                   COALESCE(AVG(CAST(score AS REAL)), 0.0) AS average_score,
                   COALESCE(MAX(score), 0) AS best_score
            FROM quiz_attempts
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("failed to summarize user attempts")?;

        Ok(summary)
    }

    /// Platform-wide quiz totals.
    #[instrument(skip(self))]
    pub async fn quiz_totals(&self) -> Result<QuizTotals> {
        let totals = sqlx::query_as::<_, QuizTotals>(
            r#"
            SELECT COUNT(*) AS attempts,
                   COALESCE(AVG(CAST(score AS REAL)), 0.0) AS average_score
            FROM quiz_attempts
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("failed to compute quiz totals")?;

        Ok(totals)
    }
}
