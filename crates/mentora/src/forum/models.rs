//! Discussion forum models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Thread entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ForumThread {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
}

/// Thread with its reply count, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ThreadSummary {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub reply_count: i64,
}

/// Reply entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ForumReply {
    pub id: String,
    pub thread_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: String,
}
