//! Leaderboard and analytics handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::analytics::{LeaderboardEntry, QuizSummary};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::auth::Identity;

const DEFAULT_LEADERBOARD_LIMIT: i64 = 20;
const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// Top users by total quiz score.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    Ok(Json(state.analytics.leaderboard(limit).await?))
}

/// Activity summary for the caller.
#[derive(Debug, Serialize)]
pub struct MySummaryResponse {
    pub quizzes: QuizSummary,
    pub tutor_conversations: i64,
    pub forum_threads: i64,
    pub forum_replies: i64,
}

pub async fn my_summary(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<MySummaryResponse>> {
    let user_id = &identity.subject_id;

    let quizzes = state.analytics.quiz_summary_for_user(user_id).await?;
    let tutor_conversations = state.tutor.count_for_user(user_id).await?;
    let (forum_threads, forum_replies) = state.forum.activity_for_user(user_id).await?;

    Ok(Json(MySummaryResponse {
        quizzes,
        tutor_conversations,
        forum_threads,
        forum_replies,
    }))
}
