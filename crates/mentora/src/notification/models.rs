//! Notification models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Notification kinds as stored.
pub mod kinds {
    pub const FORUM_REPLY: &str = "forum_reply";
    pub const BOOKING_CREATED: &str = "booking_created";
    pub const BOOKING_CANCELLED: &str = "booking_cancelled";
}

/// Notification entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}
