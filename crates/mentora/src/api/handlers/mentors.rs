//! Mentor booking handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::{Identity, roles};
use crate::mentorship::{BookOutcome, Booking, BookingView, MentorSlot, SlotView};
use crate::notification::kinds;
use crate::user::UserInfo;

/// List mentor profiles.
pub async fn list_mentors(State(state): State<AppState>) -> ApiResult<Json<Vec<UserInfo>>> {
    Ok(Json(state.users.list_mentors().await?))
}

/// A mentor's slots, including which are already taken.
pub async fn list_mentor_slots(
    State(state): State<AppState>,
    Path(mentor_id): Path<String>,
) -> ApiResult<Json<Vec<SlotView>>> {
    let mentor = state
        .users
        .get(&mentor_id)
        .await?
        .filter(|u| u.role == roles::MENTOR)
        .ok_or_else(|| ApiError::not_found("mentor not found"))?;

    Ok(Json(state.mentorship.list_slots_for_mentor(&mentor.id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateSlotRequest {
    pub starts_at: String,
    pub ends_at: String,
    pub topic: Option<String>,
}

/// Publish an availability slot. Mentor-gated at route registration.
#[instrument(skip(state, request), fields(mentor_id = %identity.subject_id))]
pub async fn create_slot(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateSlotRequest>,
) -> ApiResult<(StatusCode, Json<MentorSlot>)> {
    if request.starts_at.is_empty() || request.ends_at.is_empty() {
        return Err(ApiError::bad_request("starts_at and ends_at are required"));
    }
    if request.ends_at <= request.starts_at {
        return Err(ApiError::bad_request("slot must end after it starts"));
    }

    let slot = state
        .mentorship
        .create_slot(
            &identity.subject_id,
            &request.starts_at,
            &request.ends_at,
            request.topic.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(slot)))
}

/// Remove an unbooked slot. Mentor-gated at route registration.
#[instrument(skip(state))]
pub async fn delete_slot(
    State(state): State<AppState>,
    identity: Identity,
    Path(slot_id): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = state
        .mentorship
        .delete_slot(&slot_id, &identity.subject_id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("slot not found or already booked"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub slot_id: String,
}

/// Book a mentor slot.
#[instrument(skip(state, request), fields(student_id = %identity.subject_id))]
pub async fn create_booking(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    let slot = state
        .mentorship
        .get_slot(&request.slot_id)
        .await?
        .ok_or_else(|| ApiError::not_found("slot not found"))?;

    if slot.mentor_id == identity.subject_id {
        return Err(ApiError::bad_request("mentors cannot book their own slots"));
    }

    let booking = match state
        .mentorship
        .book_slot(&slot.id, &identity.subject_id)
        .await?
    {
        BookOutcome::Booked(booking) => booking,
        BookOutcome::SlotTaken => return Err(ApiError::conflict("slot is already booked")),
        BookOutcome::SlotGone => return Err(ApiError::not_found("slot not found")),
    };

    state
        .notifications
        .notify(
            &slot.mentor_id,
            kinds::BOOKING_CREATED,
            &format!("Your slot starting {} was booked", slot.starts_at),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// The caller's bookings as a student.
pub async fn my_bookings(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<BookingView>>> {
    Ok(Json(state.mentorship.list_for_student(&identity.subject_id).await?))
}

/// Bookings against the caller's slots. Mentor-gated at route registration.
pub async fn mentor_bookings(
    State(state): State<AppState>,
    identity: Identity,
) -> ApiResult<Json<Vec<BookingView>>> {
    Ok(Json(state.mentorship.list_for_mentor(&identity.subject_id).await?))
}

/// Cancel a booking. Allowed for the student, the slot's mentor, or an admin;
/// the counterpart is notified.
#[instrument(skip(state))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    identity: Identity,
    Path(booking_id): Path<String>,
) -> ApiResult<Json<Booking>> {
    let booking = state
        .mentorship
        .get_booking(&booking_id)
        .await?
        .ok_or_else(|| ApiError::not_found("booking not found"))?;

    let mentor_id = state
        .mentorship
        .mentor_for_booking(&booking.id)
        .await?
        .ok_or_else(|| ApiError::not_found("booking not found"))?;

    let caller = &identity.subject_id;
    if *caller != booking.student_id && *caller != mentor_id && identity.role != roles::ADMIN {
        return Err(ApiError::forbidden("not a party to this booking"));
    }

    if !state.mentorship.cancel_booking(&booking.id).await? {
        return Err(ApiError::conflict("booking is already cancelled"));
    }

    let counterpart = if *caller == booking.student_id {
        mentor_id
    } else {
        booking.student_id.clone()
    };
    state
        .notifications
        .notify(
            &counterpart,
            kinds::BOOKING_CANCELLED,
            "A mentorship booking was cancelled",
        )
        .await?;

    let booking = state
        .mentorship
        .get_booking(&booking_id)
        .await?
        .ok_or_else(|| ApiError::not_found("booking not found"))?;

    Ok(Json(booking))
}
