//! Booking time-window rules.
//!
//! Every function takes `now` explicitly so callers control the clock.

use chrono::{DateTime, Duration, Utc};

use gymhub_entity::booking::{CreateBooking, UpdateBooking};

use super::ValidationFailure;

/// Minimum notice for a new or moved booking.
pub const MIN_LEAD_TIME_HOURS: i64 = 2;
/// Minimum notice for modifying or cancelling a booking.
pub const MODIFICATION_WINDOW_HOURS: i64 = 24;

/// `start_time` must be at least two hours away.
pub fn validate_future_booking(
    start_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationFailure> {
    if start_time < now + Duration::hours(MIN_LEAD_TIME_HOURS) {
        return Err(ValidationFailure::LeadTime {
            min_hours: MIN_LEAD_TIME_HOURS,
        });
    }
    Ok(())
}

/// The stored start must be at least 24 hours away.
pub fn validate_booking_modification(
    booking_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationFailure> {
    if booking_time < now + Duration::hours(MODIFICATION_WINDOW_HOURS) {
        return Err(ValidationFailure::ModificationWindow {
            window_hours: MODIFICATION_WINDOW_HOURS,
        });
    }
    Ok(())
}

/// Bookings in the past are frozen.
pub fn validate_past_booking(
    booking_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationFailure> {
    if booking_time < now {
        return Err(ValidationFailure::PastBooking);
    }
    Ok(())
}

/// A new booking must respect the lead time.
pub fn validate_create_booking(
    request: &CreateBooking,
    now: DateTime<Utc>,
) -> Result<(), ValidationFailure> {
    validate_future_booking(request.start_time, now)
}

/// Past check and modification window on the stored start, then lead time
/// on the new start if one is supplied.
pub fn validate_update_booking(
    existing_start: DateTime<Utc>,
    update: &UpdateBooking,
    now: DateTime<Utc>,
) -> Result<(), ValidationFailure> {
    validate_past_booking(existing_start, now)?;
    validate_booking_modification(existing_start, now)?;
    if let Some(new_start) = update.start_time {
        validate_future_booking(new_start, now)?;
    }
    Ok(())
}

/// Cancellation needs a future booking outside the modification window.
pub fn validate_cancel_booking(
    booking_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationFailure> {
    validate_past_booking(booking_time, now)?;
    validate_booking_modification(booking_time, now)
}
