//! Content handlers: subjects, chapters, questions.
//!
//! Reads are open to any authenticated user; writes sit behind the ADMIN role
//! layer in route registration. Question reads here always use the student
//! view; authors use the admin endpoints to see the answer key.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::content::{Chapter, QuestionAdminView, QuestionView, Subject};

// --- reads ---

pub async fn list_subjects(State(state): State<AppState>) -> ApiResult<Json<Vec<Subject>>> {
    Ok(Json(state.content.list_subjects().await?))
}

pub async fn get_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> ApiResult<Json<Subject>> {
    let subject = state
        .content
        .get_subject(&subject_id)
        .await?
        .ok_or_else(|| ApiError::not_found("subject not found"))?;

    Ok(Json(subject))
}

pub async fn list_chapters(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> ApiResult<Json<Vec<Chapter>>> {
    if state.content.get_subject(&subject_id).await?.is_none() {
        return Err(ApiError::not_found("subject not found"));
    }

    Ok(Json(state.content.list_chapters(&subject_id).await?))
}

pub async fn get_chapter(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
) -> ApiResult<Json<Chapter>> {
    let chapter = state
        .content
        .get_chapter(&chapter_id)
        .await?
        .ok_or_else(|| ApiError::not_found("chapter not found"))?;

    Ok(Json(chapter))
}

pub async fn list_questions(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
) -> ApiResult<Json<Vec<QuestionView>>> {
    if state.content.get_chapter(&chapter_id).await?.is_none() {
        return Err(ApiError::not_found("chapter not found"));
    }

    let questions = state.content.list_questions(&chapter_id).await?;
    Ok(Json(questions.iter().map(|q| q.student_view()).collect()))
}

// --- admin writes ---

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub title: String,
    pub description: Option<String>,
}

#[instrument(skip(state, request))]
pub async fn create_subject(
    State(state): State<AppState>,
    Json(request): Json<CreateSubjectRequest>,
) -> ApiResult<(StatusCode, Json<Subject>)> {
    if request.title.trim().is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }

    let subject = state
        .content
        .create_subject(request.title.trim(), request.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(subject)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[instrument(skip(state, request))]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Json(request): Json<UpdateSubjectRequest>,
) -> ApiResult<Json<Subject>> {
    let updated = state
        .content
        .update_subject(
            &subject_id,
            request.title.as_deref(),
            request.description.as_deref(),
        )
        .await?;

    if !updated {
        return Err(ApiError::not_found("subject not found"));
    }

    let subject = state
        .content
        .get_subject(&subject_id)
        .await?
        .ok_or_else(|| ApiError::not_found("subject not found"))?;

    Ok(Json(subject))
}

#[instrument(skip(state))]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.content.delete_subject(&subject_id).await? {
        return Err(ApiError::not_found("subject not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub position: i64,
}

#[instrument(skip(state, request))]
pub async fn create_chapter(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Json(request): Json<CreateChapterRequest>,
) -> ApiResult<(StatusCode, Json<Chapter>)> {
    if request.title.trim().is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }
    if state.content.get_subject(&subject_id).await?.is_none() {
        return Err(ApiError::not_found("subject not found"));
    }

    let chapter = state
        .content
        .create_chapter(
            &subject_id,
            request.title.trim(),
            request.body.as_deref(),
            request.position,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(chapter)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateChapterRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub position: Option<i64>,
}

#[instrument(skip(state, request))]
pub async fn update_chapter(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
    Json(request): Json<UpdateChapterRequest>,
) -> ApiResult<Json<Chapter>> {
    let updated = state
        .content
        .update_chapter(
            &chapter_id,
            request.title.as_deref(),
            request.body.as_deref(),
            request.position,
        )
        .await?;

    if !updated {
        return Err(ApiError::not_found("chapter not found"));
    }

    let chapter = state
        .content
        .get_chapter(&chapter_id)
        .await?
        .ok_or_else(|| ApiError::not_found("chapter not found"))?;

    Ok(Json(chapter))
}

#[instrument(skip(state))]
pub async fn delete_chapter(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.content.delete_chapter(&chapter_id).await? {
        return Err(ApiError::not_found("chapter not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: i64,
    pub explanation: Option<String>,
}

#[instrument(skip(state, request))]
pub async fn create_question(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
    Json(request): Json<CreateQuestionRequest>,
) -> ApiResult<(StatusCode, Json<QuestionAdminView>)> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::bad_request("prompt must not be empty"));
    }
    if request.options.len() < 2 {
        return Err(ApiError::bad_request("at least two options are required"));
    }
    if request.correct_index < 0 || request.correct_index as usize >= request.options.len() {
        return Err(ApiError::bad_request("correct_index is out of range"));
    }
    if state.content.get_chapter(&chapter_id).await?.is_none() {
        return Err(ApiError::not_found("chapter not found"));
    }

    let question = state
        .content
        .create_question(
            &chapter_id,
            request.prompt.trim(),
            &request.options,
            request.correct_index,
            request.explanation.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(question.admin_view())))
}

/// Questions with answer keys, for content authors.
pub async fn list_questions_admin(
    State(state): State<AppState>,
    Path(chapter_id): Path<String>,
) -> ApiResult<Json<Vec<QuestionAdminView>>> {
    if state.content.get_chapter(&chapter_id).await?.is_none() {
        return Err(ApiError::not_found("chapter not found"));
    }

    let questions = state.content.list_questions(&chapter_id).await?;
    Ok(Json(questions.iter().map(|q| q.admin_view()).collect()))
}

#[instrument(skip(state))]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.content.delete_question(&question_id).await? {
        return Err(ApiError::not_found("question not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
