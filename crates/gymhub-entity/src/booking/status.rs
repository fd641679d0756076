//! Booking status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// The session is scheduled.
    Booked,
    /// The session was cancelled. The record and its history are kept.
    Cancelled,
}

impl BookingStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = gymhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(Self::Booked),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(gymhub_core::AppError::validation(format!(
                "Invalid booking status: '{s}'. Expected one of: booked, cancelled"
            ))),
        }
    }
}
