//! Recurrence type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an availability pattern repeats.
///
/// Weekly patterns key their schedule entries by weekday; monthly and
/// one-time patterns key them by calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    /// Every day.
    Daily,
    /// Every week on the listed weekdays.
    Weekly,
    /// Every month on the listed dates.
    Monthly,
    /// Only on the listed dates.
    OneTime,
}

impl RecurrenceType {
    /// Whether schedule entries must carry `day_of_week`.
    pub fn keyed_by_weekday(&self) -> bool {
        matches!(self, Self::Weekly)
    }

    /// Whether schedule entries must carry `date`.
    pub fn keyed_by_date(&self) -> bool {
        matches!(self, Self::Monthly | Self::OneTime)
    }

    /// Return the recurrence type as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::OneTime => "one_time",
        }
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecurrenceType {
    type Err = gymhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "one_time" => Ok(Self::OneTime),
            _ => Err(gymhub_core::AppError::validation(format!(
                "Invalid recurrence type: '{s}'. Expected one of: daily, weekly, monthly, one_time"
            ))),
        }
    }
}
