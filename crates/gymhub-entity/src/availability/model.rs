//! Availability entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gymhub_core::types::id::{AvailabilityId, CenterId, UserId};

use super::recurrence::RecurrenceType;
use super::schedule::DaySchedule;

/// A trainer's recurring (or one-off) availability at a center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Unique availability identifier.
    pub id: AvailabilityId,
    /// Owning trainer.
    pub trainer_id: UserId,
    /// Center the pattern applies to.
    pub center_id: CenterId,
    /// How the schedule repeats.
    pub recurrence_type: RecurrenceType,
    /// Per-day slots.
    pub schedule: Vec<DaySchedule>,
    /// When the pattern begins.
    pub start_date: DateTime<Utc>,
    /// When the pattern ends; open-ended if absent.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Availability {
    /// Materialize a new pattern stamped at `now`.
    pub fn new(id: AvailabilityId, data: CreateAvailability, now: DateTime<Utc>) -> Self {
        Self {
            id,
            trainer_id: data.trainer_id,
            center_id: data.center_id,
            recurrence_type: data.recurrence_type,
            schedule: data.schedule,
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the mutable fields and stamp `updated_at`.
    pub fn apply_update(&mut self, update: UpdateAvailability, now: DateTime<Utc>) {
        if let Some(schedule) = update.schedule {
            self.schedule = schedule;
        }
        if let Some(end_date) = update.end_date {
            self.end_date = Some(end_date);
        }
        self.updated_at = now;
    }
}

/// Data required to create an availability pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAvailability {
    /// Owning trainer.
    pub trainer_id: UserId,
    /// Center.
    pub center_id: CenterId,
    /// Recurrence.
    pub recurrence_type: RecurrenceType,
    /// Per-day slots.
    pub schedule: Vec<DaySchedule>,
    /// First day of the pattern.
    pub start_date: DateTime<Utc>,
    /// Optional last day.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update. Only the schedule and end date are mutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAvailability {
    /// Replacement schedule.
    #[serde(default)]
    pub schedule: Option<Vec<DaySchedule>>,
    /// Replacement end date.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}
