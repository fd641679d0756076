//! Storage document shapes.
//!
//! Each entity is persisted as one JSON document. Instants are written in
//! the fixed-width storage format from `gymhub_core::time` so that string
//! comparisons in filters follow chronological order, and times of day as
//! `HH:MM:SS`. The field names here are the ones repositories filter on.

pub mod availability;
pub mod booking;
pub mod message;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;

pub use availability::AvailabilityDocument;
pub use booking::BookingDocument;
pub use message::MessageDocument;

/// Collection names.
pub mod collections {
    /// Member profiles (managed by the identity provider flows).
    pub const USERS: &str = "users";
    /// Bookings.
    pub const BOOKINGS: &str = "bookings";
    /// Trainer availability patterns.
    pub const AVAILABILITIES: &str = "availabilities";
    /// Inbox messages.
    pub const MESSAGES: &str = "messages";
    /// Gym centers.
    pub const GYM_CENTERS: &str = "gymcenters";
}

/// Serialize a storage document to JSON.
pub fn to_body<T: Serialize>(doc: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(doc)?)
}

/// Parse a stored JSON body.
pub fn from_body<T: DeserializeOwned>(collection: &str, body: Value) -> AppResult<T> {
    serde_json::from_value(body).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Malformed document in '{collection}': {e}"),
            e,
        )
    })
}
