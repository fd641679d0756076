//! Availability storage document.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use gymhub_core::time::{storage_instant, storage_instant_opt, time_of_day};
use gymhub_core::types::id::{AvailabilityId, CenterId, UserId};
use gymhub_entity::availability::{Availability, DaySchedule, RecurrenceType, TimeSlot};

/// Stored time slot: two `HH:MM:SS` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotDocument {
    #[serde(with = "time_of_day")]
    pub start_time: NaiveTime,
    #[serde(with = "time_of_day")]
    pub end_time: NaiveTime,
}

/// Stored day entry. Absent keys are omitted rather than written as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayScheduleDocument {
    pub available: bool,
    pub time_slots: Vec<TimeSlotDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "storage_instant_opt"
    )]
    pub date: Option<DateTime<Utc>>,
}

/// Stored form of [`Availability`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityDocument {
    pub id: AvailabilityId,
    pub trainer_id: UserId,
    pub center_id: CenterId,
    pub recurrence_type: RecurrenceType,
    pub schedule: Vec<DayScheduleDocument>,
    #[serde(with = "storage_instant")]
    pub start_date: DateTime<Utc>,
    #[serde(default, with = "storage_instant_opt")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(with = "storage_instant")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "storage_instant")]
    pub updated_at: DateTime<Utc>,
}

impl From<&DaySchedule> for DayScheduleDocument {
    fn from(day: &DaySchedule) -> Self {
        Self {
            available: day.available,
            time_slots: day
                .time_slots
                .iter()
                .map(|slot| TimeSlotDocument {
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                })
                .collect(),
            day_of_week: day.day_of_week,
            date: day.date,
        }
    }
}

impl From<DayScheduleDocument> for DaySchedule {
    fn from(doc: DayScheduleDocument) -> Self {
        Self {
            day_of_week: doc.day_of_week,
            date: doc.date,
            time_slots: doc
                .time_slots
                .into_iter()
                .map(|slot| TimeSlot::new(slot.start_time, slot.end_time))
                .collect(),
            available: doc.available,
        }
    }
}

impl From<&Availability> for AvailabilityDocument {
    fn from(a: &Availability) -> Self {
        Self {
            id: a.id,
            trainer_id: a.trainer_id,
            center_id: a.center_id,
            recurrence_type: a.recurrence_type,
            schedule: a.schedule.iter().map(Into::into).collect(),
            start_date: a.start_date,
            end_date: a.end_date,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl From<AvailabilityDocument> for Availability {
    fn from(doc: AvailabilityDocument) -> Self {
        Self {
            id: doc.id,
            trainer_id: doc.trainer_id,
            center_id: doc.center_id,
            recurrence_type: doc.recurrence_type,
            schedule: doc.schedule.into_iter().map(Into::into).collect(),
            start_date: doc.start_date,
            end_date: doc.end_date,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gymhub_entity::availability::CreateAvailability;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_schedule() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let date = Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap();
        let availability = Availability::new(
            AvailabilityId::new(),
            CreateAvailability {
                trainer_id: UserId::new(),
                center_id: CenterId::new(),
                recurrence_type: RecurrenceType::Weekly,
                schedule: vec![
                    DaySchedule::weekly(0, vec![TimeSlot::new(t(9, 0, 0), t(10, 30, 15))]),
                    DaySchedule::on_date(date, vec![TimeSlot::new(t(17, 45, 59), t(18, 0, 0))]),
                ],
                start_date: now,
                end_date: None,
            },
            now,
        );

        let body = serde_json::to_value(AvailabilityDocument::from(&availability)).unwrap();
        assert_eq!(body["schedule"][0]["time_slots"][0]["end_time"], "10:30:15");
        assert!(body["schedule"][0].get("date").is_none());
        assert!(body["schedule"][1].get("day_of_week").is_none());
        assert!(body["end_date"].is_null());
        assert_eq!(body["recurrence_type"], "weekly");

        let back: Availability = serde_json::from_value::<AvailabilityDocument>(body)
            .unwrap()
            .into();
        assert_eq!(back.schedule, availability.schedule);
        assert_eq!(back, availability);
    }
}
