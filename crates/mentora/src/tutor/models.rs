//! Tutor conversation models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Message author labels as stored.
pub mod authors {
    pub const STUDENT: &str = "student";
    pub const TUTOR: &str = "tutor";
}

/// Conversation entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TutorConversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Message entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TutorMessage {
    pub id: String,
    pub conversation_id: String,
    pub author: String,
    pub body: String,
    pub created_at: String,
}
