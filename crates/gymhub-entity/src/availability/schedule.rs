//! Day schedules and time slots.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A wall-clock interval within one day. `end_time` must be after
/// `start_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Interval start (`HH:MM:SS`).
    #[serde(with = "gymhub_core::time::time_of_day")]
    pub start_time: NaiveTime,
    /// Interval end (`HH:MM:SS`).
    #[serde(with = "gymhub_core::time::time_of_day")]
    pub end_time: NaiveTime,
}

impl TimeSlot {
    /// Create a slot.
    pub fn new(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            start_time,
            end_time,
        }
    }
}

/// The slots offered on one weekday or one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Weekday, 0 = Monday through 6 = Sunday. Set for weekly patterns.
    #[serde(default)]
    pub day_of_week: Option<u8>,
    /// Calendar date (UTC). Set for monthly and one-time patterns.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Offered slots.
    pub time_slots: Vec<TimeSlot>,
    /// `false` marks a day off.
    #[serde(default = "default_available")]
    pub available: bool,
}

impl DaySchedule {
    /// A weekday entry.
    pub fn weekly(day_of_week: u8, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            day_of_week: Some(day_of_week),
            date: None,
            time_slots,
            available: true,
        }
    }

    /// A calendar-date entry.
    pub fn on_date(date: DateTime<Utc>, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            day_of_week: None,
            date: Some(date),
            time_slots,
            available: true,
        }
    }

    /// Slots ordered by start time.
    pub fn sorted_slots(&self) -> Vec<TimeSlot> {
        let mut slots = self.time_slots.clone();
        slots.sort_by_key(|s| s.start_time);
        slots
    }
}

fn default_available() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_defaults_to_true() {
        let day: DaySchedule = serde_json::from_value(serde_json::json!({
            "day_of_week": 2,
            "time_slots": [{ "start_time": "09:00:00", "end_time": "10:00" }]
        }))
        .unwrap();
        assert!(day.available);
        assert_eq!(day.time_slots[0].end_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_sorted_slots() {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        let day = DaySchedule::weekly(0, vec![TimeSlot::new(t(14), t(15)), TimeSlot::new(t(9), t(10))]);
        let sorted = day.sorted_slots();
        assert_eq!(sorted[0].start_time, t(9));
        assert_eq!(sorted[1].start_time, t(14));
    }
}
