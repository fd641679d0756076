//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gymhub_core::types::id::{BookingId, CenterId, UserId};

use super::change::BookingChange;
use super::status::BookingStatus;

/// A member's reservation of a trainer's time at a center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// The member who booked.
    pub user_id: UserId,
    /// The trainer booked.
    pub trainer_id: UserId,
    /// Where the session takes place.
    pub center_id: CenterId,
    /// Session start (UTC).
    pub start_time: DateTime<Utc>,
    /// Session end (UTC).
    pub end_time: DateTime<Utc>,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Optional note from the member.
    #[serde(default)]
    pub message: Option<String>,
    /// Append-only change history, oldest first.
    #[serde(default)]
    pub changes: Vec<BookingChange>,
}

impl Booking {
    /// Materialize a freshly requested booking.
    pub fn new(id: BookingId, data: CreateBooking) -> Self {
        Self {
            id,
            user_id: data.user_id,
            trainer_id: data.trainer_id,
            center_id: data.center_id,
            start_time: data.start_time,
            end_time: data.end_time,
            status: BookingStatus::Booked,
            message: data.message,
            changes: Vec::new(),
        }
    }

    /// Check if the booking has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    /// Whether applying `update` would change any stored value.
    pub fn differs_from(&self, update: &UpdateBooking) -> bool {
        update.start_time.is_some_and(|t| t != self.start_time)
            || update.end_time.is_some_and(|t| t != self.end_time)
            || update
                .message
                .as_ref()
                .is_some_and(|m| self.message.as_deref() != Some(m.as_str()))
    }

    /// Record a modification and apply the supplied fields.
    pub fn apply_update(&mut self, update: UpdateBooking, now: DateTime<Utc>) {
        self.changes.push(BookingChange::modification(
            now,
            self.start_time,
            self.end_time,
        ));
        if let Some(start) = update.start_time {
            self.start_time = start;
        }
        if let Some(end) = update.end_time {
            self.end_time = end;
        }
        if let Some(message) = update.message {
            self.message = Some(message);
        }
    }

    /// Record a cancellation and flip the status.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        self.changes.push(BookingChange::cancellation(now));
        self.status = BookingStatus::Cancelled;
    }
}

/// Data required to create a new booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBooking {
    /// The member booking the session.
    pub user_id: UserId,
    /// The trainer.
    pub trainer_id: UserId,
    /// The center.
    pub center_id: CenterId,
    /// Requested start.
    pub start_time: DateTime<Utc>,
    /// Requested end.
    pub end_time: DateTime<Utc>,
    /// Optional note.
    #[serde(default)]
    pub message: Option<String>,
}

/// Partial update of a booking. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBooking {
    /// New start.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// New end.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// New note.
    #[serde(default)]
    pub message: Option<String>,
}
