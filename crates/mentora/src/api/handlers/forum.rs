//! Forum handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::{Identity, roles};
use crate::forum::{ForumReply, ForumThread, ThreadSummary};
use crate::notification::kinds;

#[derive(Debug, Deserialize)]
pub struct CreateThreadRequest {
    pub title: String,
    pub body: String,
}

#[instrument(skip(state, request), fields(user_id = %identity.subject_id))]
pub async fn create_thread(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateThreadRequest>,
) -> ApiResult<(StatusCode, Json<ForumThread>)> {
    if request.title.trim().is_empty() || request.body.trim().is_empty() {
        return Err(ApiError::bad_request("title and body must not be empty"));
    }

    let thread = state
        .forum
        .create_thread(
            &identity.subject_id,
            request.title.trim(),
            request.body.trim(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(thread)))
}

pub async fn list_threads(State(state): State<AppState>) -> ApiResult<Json<Vec<ThreadSummary>>> {
    Ok(Json(state.forum.list_threads().await?))
}

/// Thread with its replies.
#[derive(Debug, Serialize)]
pub struct ThreadDetail {
    #[serde(flatten)]
    pub thread: ForumThread,
    pub replies: Vec<ForumReply>,
}

pub async fn get_thread(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<ThreadDetail>> {
    let thread = state
        .forum
        .get_thread(&thread_id)
        .await?
        .ok_or_else(|| ApiError::not_found("thread not found"))?;

    let replies = state.forum.list_replies(&thread.id).await?;

    Ok(Json(ThreadDetail { thread, replies }))
}

/// Delete a thread. Allowed for the author and for admins.
#[instrument(skip(state))]
pub async fn delete_thread(
    State(state): State<AppState>,
    identity: Identity,
    Path(thread_id): Path<String>,
) -> ApiResult<StatusCode> {
    let thread = state
        .forum
        .get_thread(&thread_id)
        .await?
        .ok_or_else(|| ApiError::not_found("thread not found"))?;

    if thread.author_id != identity.subject_id && identity.role != roles::ADMIN {
        return Err(ApiError::forbidden("only the author or an admin may delete a thread"));
    }

    state.forum.delete_thread(&thread.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CreateReplyRequest {
    pub body: String,
}

/// Reply to a thread. The thread author is notified, unless they replied to
/// themselves.
#[instrument(skip(state, request), fields(user_id = %identity.subject_id))]
pub async fn create_reply(
    State(state): State<AppState>,
    identity: Identity,
    Path(thread_id): Path<String>,
    Json(request): Json<CreateReplyRequest>,
) -> ApiResult<(StatusCode, Json<ForumReply>)> {
    if request.body.trim().is_empty() {
        return Err(ApiError::bad_request("reply body must not be empty"));
    }

    let thread = state
        .forum
        .get_thread(&thread_id)
        .await?
        .ok_or_else(|| ApiError::not_found("thread not found"))?;

    let reply = state
        .forum
        .create_reply(&thread.id, &identity.subject_id, request.body.trim())
        .await?;

    if thread.author_id != identity.subject_id {
        state
            .notifications
            .notify(
                &thread.author_id,
                kinds::FORUM_REPLY,
                &format!("New reply in \"{}\"", thread.title),
            )
            .await?;
    }

    Ok((StatusCode::CREATED, Json(reply)))
}
