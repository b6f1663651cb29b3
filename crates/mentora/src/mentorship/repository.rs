//! Mentor booking repository.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::instrument;

use super::models::{Booking, BookingView, MentorSlot, SlotView, status};

/// Outcome of a booking insert.
#[derive(Debug)]
pub enum BookOutcome {
    Booked(Booking),
    /// The slot already has a live booking.
    SlotTaken,
    /// The slot was deleted between lookup and insert.
    SlotGone,
}

const BOOKING_VIEW_QUERY: &str = r#"
    SELECT b.id, b.slot_id, b.student_id, s.mentor_id, b.status,
           s.starts_at, s.ends_at, s.topic, b.created_at
    FROM bookings b
    JOIN mentor_slots s ON s.id = b.slot_id
"#;

/// Repository for mentor slots and bookings.
#[derive(Debug, Clone)]
pub struct MentorshipRepository {
    pool: SqlitePool,
}

impl MentorshipRepository {
    /// Create a new mentorship repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Publish an availability slot.
    #[instrument(skip(self, topic))]
    pub async fn create_slot(
        &self,
        mentor_id: &str,
        starts_at: &str,
        ends_at: &str,
        topic: Option<&str>,
    ) -> Result<MentorSlot> {
        let id = nanoid::nanoid!();

        sqlx::query(
            "INSERT INTO mentor_slots (id, mentor_id, starts_at, ends_at, topic) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(mentor_id)
        .bind(starts_at)
        .bind(ends_at)
        .bind(topic)
        .execute(&self.pool)
        .await
        .context("failed to insert slot")?;

        self.get_slot(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("slot not found after creation"))
    }

    /// Get a slot by ID.
    #[instrument(skip(self))]
    pub async fn get_slot(&self, id: &str) -> Result<Option<MentorSlot>> {
        let slot = sqlx::query_as::<_, MentorSlot>(
            "SELECT id, mentor_id, starts_at, ends_at, topic, created_at \
             FROM mentor_slots WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch slot")?;

        Ok(slot)
    }

    /// A mentor's slots with their availability, soonest first.
    #[instrument(skip(self))]
    pub async fn list_slots_for_mentor(&self, mentor_id: &str) -> Result<Vec<SlotView>> {
        let slots = sqlx::query_as::<_, SlotView>(
            r#"
            SELECT s.id, s.mentor_id, s.starts_at, s.ends_at, s.topic,
                   EXISTS (
                       SELECT 1 FROM bookings b
                       WHERE b.slot_id = s.id AND b.status = 'CONFIRMED'
                   ) AS booked
            FROM mentor_slots s
            WHERE s.mentor_id = ?
            ORDER BY s.starts_at, s.id
            "#,
        )
        .bind(mentor_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list slots")?;

        Ok(slots)
    }

    /// Remove an unbooked slot owned by the mentor.
    #[instrument(skip(self))]
    pub async fn delete_slot(&self, id: &str, mentor_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM mentor_slots
            WHERE id = ? AND mentor_id = ?
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.slot_id = mentor_slots.id AND b.status = 'CONFIRMED'
              )
            "#,
        )
        .bind(id)
        .bind(mentor_id)
        .execute(&self.pool)
        .await
        .context("failed to delete slot")?;

        Ok(result.rows_affected() > 0)
    }

    /// Book a slot for a student.
    ///
    /// The partial unique index settles the race between two students; the
    /// foreign key catches a slot deleted between lookup and insert.
    #[instrument(skip(self))]
    pub async fn book_slot(&self, slot_id: &str, student_id: &str) -> Result<BookOutcome> {
        let id = nanoid::nanoid!();

        let insert = sqlx::query(
            "INSERT INTO bookings (id, slot_id, student_id, status) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(slot_id)
        .bind(student_id)
        .bind(status::CONFIRMED)
        .execute(&self.pool)
        .await;

        match insert {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Ok(BookOutcome::SlotTaken);
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Ok(BookOutcome::SlotGone);
            }
            Err(e) => return Err(e).context("failed to insert booking"),
        }

        let booking = self
            .get_booking(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("booking not found after creation"))?;

        Ok(BookOutcome::Booked(booking))
    }

    /// Get a booking by ID.
    #[instrument(skip(self))]
    pub async fn get_booking(&self, id: &str) -> Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT id, slot_id, student_id, status, created_at, cancelled_at \
             FROM bookings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch booking")?;

        Ok(booking)
    }

    /// A student's bookings with slot details, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_student(&self, student_id: &str) -> Result<Vec<BookingView>> {
        let bookings = sqlx::query_as::<_, BookingView>(&format!(
            "{BOOKING_VIEW_QUERY} WHERE b.student_id = ? ORDER BY b.created_at DESC, b.id DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list student bookings")?;

        Ok(bookings)
    }

    /// Bookings against a mentor's slots, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_mentor(&self, mentor_id: &str) -> Result<Vec<BookingView>> {
        let bookings = sqlx::query_as::<_, BookingView>(&format!(
            "{BOOKING_VIEW_QUERY} WHERE s.mentor_id = ? ORDER BY b.created_at DESC, b.id DESC"
        ))
        .bind(mentor_id)
        .fetch_all(&self.pool)
        .await
        .context("failed to list mentor bookings")?;

        Ok(bookings)
    }

    /// Cancel a live booking. Already-cancelled bookings are left untouched.
    #[instrument(skip(self))]
    pub async fn cancel_booking(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET status = ?, cancelled_at = datetime('now') \
             WHERE id = ? AND status = ?",
        )
        .bind(status::CANCELLED)
        .bind(id)
        .bind(status::CONFIRMED)
        .execute(&self.pool)
        .await
        .context("failed to cancel booking")?;

        Ok(result.rows_affected() > 0)
    }

    /// The mentor owning a booking's slot, for cancellation permission checks.
    #[instrument(skip(self))]
    pub async fn mentor_for_booking(&self, booking_id: &str) -> Result<Option<String>> {
        let mentor = sqlx::query_as::<_, (String,)>(
            "SELECT s.mentor_id FROM bookings b \
             JOIN mentor_slots s ON s.id = b.slot_id WHERE b.id = ?",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to resolve booking mentor")?;

        Ok(mentor.map(|(id,)| id))
    }

    /// Total live bookings, for the admin analytics view.
    #[instrument(skip(self))]
    pub async fn count_confirmed(&self) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE status = 'CONFIRMED'")
                .fetch_one(&self.pool)
                .await
                .context("failed to count bookings")?;

        Ok(count)
    }
}
