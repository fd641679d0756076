//! Booking storage document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gymhub_core::time::{storage_instant, storage_instant_opt};
use gymhub_core::types::id::{BookingId, CenterId, UserId};
use gymhub_entity::booking::{Booking, BookingChange, BookingStatus, ChangeType};

/// Stored form of [`BookingChange`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingChangeDocument {
    #[serde(with = "storage_instant")]
    pub timestamp: DateTime<Utc>,
    pub change_type: ChangeType,
    #[serde(default, with = "storage_instant_opt")]
    pub previous_start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "storage_instant_opt")]
    pub previous_end_time: Option<DateTime<Utc>>,
}

/// Stored form of [`Booking`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDocument {
    pub id: BookingId,
    pub user_id: UserId,
    pub trainer_id: UserId,
    pub center_id: CenterId,
    #[serde(with = "storage_instant")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "storage_instant")]
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub changes: Vec<BookingChangeDocument>,
}

impl From<&BookingChange> for BookingChangeDocument {
    fn from(change: &BookingChange) -> Self {
        Self {
            timestamp: change.timestamp,
            change_type: change.change_type,
            previous_start_time: change.previous_start_time,
            previous_end_time: change.previous_end_time,
        }
    }
}

impl From<BookingChangeDocument> for BookingChange {
    fn from(doc: BookingChangeDocument) -> Self {
        Self {
            timestamp: doc.timestamp,
            change_type: doc.change_type,
            previous_start_time: doc.previous_start_time,
            previous_end_time: doc.previous_end_time,
        }
    }
}

impl From<&Booking> for BookingDocument {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            trainer_id: booking.trainer_id,
            center_id: booking.center_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: booking.status,
            message: booking.message.clone(),
            changes: booking.changes.iter().map(Into::into).collect(),
        }
    }
}

impl From<BookingDocument> for Booking {
    fn from(doc: BookingDocument) -> Self {
        Self {
            id: doc.id,
            user_id: doc.user_id,
            trainer_id: doc.trainer_id,
            center_id: doc.center_id,
            start_time: doc.start_time,
            end_time: doc.end_time,
            status: doc.status,
            message: doc.message,
            changes: doc.changes.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use gymhub_entity::booking::CreateBooking;

    #[test]
    fn test_storage_shape() {
        let start = Utc.with_ymd_and_hms(2025, 3, 11, 22, 0, 0).unwrap();
        let mut booking = Booking::new(
            BookingId::new(),
            CreateBooking {
                user_id: UserId::new(),
                trainer_id: UserId::new(),
                center_id: CenterId::new(),
                start_time: start,
                end_time: start + Duration::hours(1),
                message: None,
            },
        );
        booking.cancel(start - Duration::days(2));

        let body = serde_json::to_value(BookingDocument::from(&booking)).unwrap();
        assert_eq!(body["start_time"], "2025-03-11T22:00:00.000000+00:00");
        assert_eq!(body["user_id"], booking.user_id.to_string());
        assert_eq!(body["status"], "cancelled");
        assert_eq!(body["changes"][0]["change_type"], "cancellation");
        assert!(body["changes"][0]["previous_start_time"].is_null());

        let back: Booking = serde_json::from_value::<BookingDocument>(body).unwrap().into();
        assert_eq!(back, booking);
    }
}
