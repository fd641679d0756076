//! Booking change history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of change recorded in a booking's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Start, end or message was changed.
    Modification,
    /// The booking was cancelled.
    Cancellation,
}

impl ChangeType {
    /// Return the change type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modification => "modification",
            Self::Cancellation => "cancellation",
        }
    }
}

/// One append-only entry in a booking's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingChange {
    /// When the change was applied.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub change_type: ChangeType,
    /// Start time before a modification.
    #[serde(default)]
    pub previous_start_time: Option<DateTime<Utc>>,
    /// End time before a modification.
    #[serde(default)]
    pub previous_end_time: Option<DateTime<Utc>>,
}

impl BookingChange {
    /// A modification entry capturing the times it replaced.
    pub fn modification(
        timestamp: DateTime<Utc>,
        previous_start_time: DateTime<Utc>,
        previous_end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            change_type: ChangeType::Modification,
            previous_start_time: Some(previous_start_time),
            previous_end_time: Some(previous_end_time),
        }
    }

    /// A cancellation entry.
    pub fn cancellation(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            change_type: ChangeType::Cancellation,
            previous_start_time: None,
            previous_end_time: None,
        }
    }
}
