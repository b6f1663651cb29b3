//! Admin handlers: user management and platform analytics.
//!
//! Every handler here sits behind the `{ADMIN}` role layer in route
//! registration; none of them re-check the role themselves.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::Identity;
use crate::user::{User, is_valid_role};

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<User>> {
    let user = state
        .users
        .get(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// Change a user's role. Takes effect on the user's next issued token.
#[instrument(skip(state, request))]
pub async fn update_user_role(
    State(state): State<AppState>,
    identity: Identity,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> ApiResult<Json<User>> {
    if !is_valid_role(&request.role) {
        return Err(ApiError::bad_request(format!(
            "unknown role: {}",
            request.role
        )));
    }
    if user_id == identity.subject_id {
        return Err(ApiError::bad_request("cannot change your own role"));
    }

    if !state.users.update_role(&user_id, &request.role).await? {
        return Err(ApiError::not_found("user not found"));
    }

    info!(user_id = %user_id, role = %request.role, "role updated");

    let user = state
        .users
        .get(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn deactivate_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    if user_id == identity.subject_id {
        return Err(ApiError::bad_request("cannot deactivate your own account"));
    }

    if !state.users.set_active(&user_id, false).await? {
        return Err(ApiError::not_found("user not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn activate_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.users.set_active(&user_id, true).await? {
        return Err(ApiError::not_found("user not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    if user_id == identity.subject_id {
        return Err(ApiError::bad_request("cannot delete your own account"));
    }

    if !state.users.delete(&user_id).await? {
        return Err(ApiError::not_found("user not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Platform-wide totals.
#[derive(Debug, Serialize)]
pub struct PlatformAnalytics {
    pub users_by_role: HashMap<String, i64>,
    pub subjects: i64,
    pub chapters: i64,
    pub questions: i64,
    pub quiz_attempts: i64,
    pub average_quiz_score: f64,
    pub forum_threads: i64,
    pub confirmed_bookings: i64,
}

pub async fn platform_analytics(
    State(state): State<AppState>,
) -> ApiResult<Json<PlatformAnalytics>> {
    let users_by_role: HashMap<String, i64> =
        state.users.count_by_role().await?.into_iter().collect();
    let (subjects, chapters, questions) = state.content.counts().await?;
    let quiz_totals = state.analytics.quiz_totals().await?;
    let forum_threads = state.forum.count_threads().await?;
    let confirmed_bookings = state.mentorship.count_confirmed().await?;

    Ok(Json(PlatformAnalytics {
        users_by_role,
        subjects,
        chapters,
        questions,
        quiz_attempts: quiz_totals.attempts,
        average_quiz_score: quiz_totals.average_score,
        forum_threads,
        confirmed_bookings,
    }))
}
