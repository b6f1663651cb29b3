//! AI tutor chat handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::Identity;
use crate::tutor::{TurnAuthor, TutorConversation, TutorMessage, TutorTurn, authors};

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub title: Option<String>,
}

#[instrument(skip(state, request), fields(user_id = %identity.subject_id))]
pub async fn create_conversation(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateConversationRequest>,
) -> ApiResult<(StatusCode, Json<TutorConversation>)> {
    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("New conversation");

    let conversation = state
        .tutor
        .create_conversation(&identity.subject_id, title)
        .await?;

    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn list_conversations(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<TutorConversation>>> {
    Ok(Json(state.tutor.list_for_user(&identity.subject_id).await?))
}

/// Conversation with its full message history.
#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub conversation: TutorConversation,
    pub messages: Vec<TutorMessage>,
}

/// Fetch a conversation the caller owns. Other users' conversations look
/// like they don't exist.
async fn owned_conversation(
    state: &AppState,
    identity: &Identity,
    conversation_id: &str,
) -> ApiResult<TutorConversation> {
    let conversation = state
        .tutor
        .get_conversation(conversation_id)
        .await?
        .filter(|c| c.user_id == identity.subject_id)
        .ok_or_else(|| ApiError::not_found("conversation not found"))?;

    Ok(conversation)
}

pub async fn get_conversation(
    State(state): State<AppState>,
    identity: Identity,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<ConversationDetail>> {
    let conversation = owned_conversation(&state, &identity, &conversation_id).await?;
    let messages = state.tutor.list_messages(&conversation.id).await?;

    Ok(Json(ConversationDetail {
        conversation,
        messages,
    }))
}

#[instrument(skip(state))]
pub async fn delete_conversation(
    State(state): State<AppState>,
    identity: Identity,
    Path(conversation_id): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = state
        .tutor
        .delete_conversation(&conversation_id, &identity.subject_id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("conversation not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

/// Student message and the tutor's reply.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message: TutorMessage,
    pub reply: TutorMessage,
}

/// Send a message and get the tutor's reply.
///
/// The student message is persisted before the provider call, so a provider
/// outage never loses what the student wrote.
#[instrument(skip(state, request), fields(user_id = %identity.subject_id))]
pub async fn send_message(
    State(state): State<AppState>,
    identity: Identity,
    Path(conversation_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let body = request.body.trim();
    if body.is_empty() {
        return Err(ApiError::bad_request("message body must not be empty"));
    }

    let conversation = owned_conversation(&state, &identity, &conversation_id).await?;

    let message = state
        .tutor
        .append_message(&conversation.id, authors::STUDENT, body)
        .await?;

    let history: Vec<TutorTurn> = state
        .tutor
        .list_messages(&conversation.id)
        .await?
        .into_iter()
        .map(|m| TutorTurn {
            author: if m.author == authors::TUTOR {
                TurnAuthor::Tutor
            } else {
                TurnAuthor::Student
            },
            body: m.body,
        })
        .collect();

    let reply_body = match state.tutor_backend.reply(&history).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(conversation_id = %conversation.id, error = %format!("{e:#}"), "tutor provider failed");
            return Err(ApiError::bad_gateway("tutor is unavailable right now"));
        }
    };

    let reply = state
        .tutor
        .append_message(&conversation.id, authors::TUTOR, &reply_body)
        .await?;

    Ok(Json(SendMessageResponse { message, reply }))
}
