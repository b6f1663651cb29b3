//! Quiz handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::Identity;
use crate::content::QuestionView;
use crate::quiz::{self, AttemptView, GradedQuiz};

/// Quiz for a chapter: the questions with the answer key withheld.
#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub chapter_id: String,
    pub questions: Vec<QuestionView>,
}

pub async fn get_quiz(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
) -> ApiResult<Json<QuizResponse>> {
    if state.content.get_chapter(&chapter_id).await?.is_none() {
        return Err(ApiError::not_found("chapter not found"));
    }

    let questions = state.content.list_questions(&chapter_id).await?;

    Ok(Json(QuizResponse {
        chapter_id,
        questions: questions.iter().map(|q| q.student_view()).collect(),
    }))
}

/// Quiz submission: question id -> chosen option index.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: HashMap<String, i64>,
}

/// Graded submission plus the stored attempt id.
#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub attempt_id: String,
    #[serde(flatten)]
    pub graded: GradedQuiz,
}

/// Grade a submission server-side and persist the attempt.
#[instrument(skip(state, request), fields(user_id = %identity.subject_id))]
pub async fn submit_quiz(
    State(state): State<AppState>,
    identity: Identity,
    Path(chapter_id): Path<String>,
    Json(request): Json<SubmitQuizRequest>,
) -> ApiResult<Json<SubmitQuizResponse>> {
    if state.content.get_chapter(&chapter_id).await?.is_none() {
        return Err(ApiError::not_found("chapter not found"));
    }

    let questions = state.content.list_questions(&chapter_id).await?;
    if questions.is_empty() {
        return Err(ApiError::bad_request("chapter has no questions"));
    }

    let graded = quiz::grade(&questions, &request.answers);

    let attempt = state
        .quizzes
        .record_attempt(
            &identity.subject_id,
            &chapter_id,
            graded.score,
            graded.total,
            &request.answers,
            &graded.results,
        )
        .await?;

    info!(
        attempt_id = %attempt.id,
        score = graded.score,
        total = graded.total,
        "quiz graded"
    );

    Ok(Json(SubmitQuizResponse {
        attempt_id: attempt.id,
        graded,
    }))
}

/// The caller's attempt history, newest first.
pub async fn my_attempts(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<AttemptView>>> {
    let attempts = state.quizzes.list_for_user(&identity.subject_id).await?;
    Ok(Json(attempts.iter().map(|a| a.view()).collect()))
}
