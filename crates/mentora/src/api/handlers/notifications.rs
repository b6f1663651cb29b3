//! Notification handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::Identity;
use crate::notification::Notification;

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread: bool,
}

/// The caller's notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = state
        .notifications
        .list_for_user(&identity.subject_id, query.unread)
        .await?;

    Ok(Json(notifications))
}

/// Mark one notification read.
pub async fn mark_read(
    State(state): State<AppState>,
    identity: Identity,
    Path(notification_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let marked = state
        .notifications
        .mark_read(&notification_id, &identity.subject_id)
        .await?;

    if !marked {
        return Err(ApiError::not_found("notification not found"));
    }

    Ok(Json(json!({"status": "ok"})))
}

/// Mark all of the caller's notifications read.
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked: u64,
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let marked = state
        .notifications
        .mark_all_read(&identity.subject_id)
        .await?;

    Ok(Json(MarkAllReadResponse { marked }))
}
