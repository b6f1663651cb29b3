//! Mentor booking models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Booking status labels as stored.
pub mod status {
    pub const CONFIRMED: &str = "CONFIRMED";
    pub const CANCELLED: &str = "CANCELLED";
}

/// Availability slot published by a mentor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MentorSlot {
    pub id: String,
    pub mentor_id: String,
    pub starts_at: String,
    pub ends_at: String,
    pub topic: Option<String>,
    pub created_at: String,
}

/// Slot with its availability, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SlotView {
    pub id: String,
    pub mentor_id: String,
    pub starts_at: String,
    pub ends_at: String,
    pub topic: Option<String>,
    pub booked: bool,
}

/// Booking entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: String,
    pub slot_id: String,
    pub student_id: String,
    pub status: String,
    pub created_at: String,
    pub cancelled_at: Option<String>,
}

/// Booking joined with its slot, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingView {
    pub id: String,
    pub slot_id: String,
    pub student_id: String,
    pub mentor_id: String,
    pub status: String,
    pub starts_at: String,
    pub ends_at: String,
    pub topic: Option<String>,
    pub created_at: String,
}
