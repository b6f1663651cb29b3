//! Mentor availability and booking.

mod models;
mod repository;

pub use models::{Booking, BookingView, MentorSlot, SlotView, status};
pub use repository::{BookOutcome, MentorshipRepository};
