//! Availability schedule rules.

use chrono::{DateTime, Utc};

use gymhub_entity::availability::{
    CreateAvailability, DaySchedule, RecurrenceType, UpdateAvailability,
};

use super::ValidationFailure;

/// Highest valid `day_of_week` (Sunday).
pub const MAX_DAY_OF_WEEK: u8 = 6;

/// Within each day, every slot must end after it starts and, once sorted
/// by start, end no later than the next one starts. Touching is fine.
pub fn validate_time_slots(schedule: &[DaySchedule]) -> Result<(), ValidationFailure> {
    for day in schedule {
        if day.time_slots.iter().any(|s| s.end_time <= s.start_time) {
            return Err(ValidationFailure::SlotOrder);
        }
        let slots = day.sorted_slots();
        if slots.windows(2).any(|w| w[0].end_time > w[1].start_time) {
            return Err(ValidationFailure::Overlap);
        }
    }
    Ok(())
}

/// Start must not be in the past; an end date must follow the start.
pub fn validate_dates(
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), ValidationFailure> {
    if start_date < now {
        return Err(ValidationFailure::PastStart);
    }
    if end_date.is_some_and(|end| end <= start_date) {
        return Err(ValidationFailure::DateOrder);
    }
    Ok(())
}

/// Weekly entries are keyed by weekday; monthly and one-time entries by
/// date; daily entries are unconstrained.
pub fn validate_recurrence_schedule(
    recurrence_type: RecurrenceType,
    schedule: &[DaySchedule],
) -> Result<(), ValidationFailure> {
    for day in schedule {
        if let Some(dow) = day.day_of_week.filter(|d| *d > MAX_DAY_OF_WEEK) {
            return Err(ValidationFailure::DayOfWeekRange(dow));
        }

        if recurrence_type.keyed_by_weekday() {
            if day.day_of_week.is_none() {
                return Err(ValidationFailure::ScheduleMismatch(
                    "Weekly schedule requires day_of_week to be set".to_string(),
                ));
            }
            if day.date.is_some() {
                return Err(ValidationFailure::ScheduleMismatch(
                    "Weekly schedule should not include specific dates".to_string(),
                ));
            }
        } else if recurrence_type.keyed_by_date() {
            if day.date.is_none() {
                return Err(ValidationFailure::ScheduleMismatch(format!(
                    "{recurrence_type} schedule requires specific dates"
                )));
            }
            if day.day_of_week.is_some() {
                return Err(ValidationFailure::ScheduleMismatch(format!(
                    "{recurrence_type} schedule should not include day_of_week"
                )));
            }
        }
    }
    Ok(())
}

/// Slot, date and recurrence checks for a new pattern.
pub fn validate_create_availability(
    request: &CreateAvailability,
    now: DateTime<Utc>,
) -> Result<(), ValidationFailure> {
    validate_time_slots(&request.schedule)?;
    validate_dates(request.start_date, request.end_date, now)?;
    validate_recurrence_schedule(request.recurrence_type, &request.schedule)
}

/// Started patterns are frozen; otherwise the new schedule and end date
/// are checked against the stored start.
pub fn validate_update_availability(
    existing_start_date: DateTime<Utc>,
    update: &UpdateAvailability,
    now: DateTime<Utc>,
) -> Result<(), ValidationFailure> {
    if existing_start_date < now {
        return Err(ValidationFailure::Immutable);
    }
    if let Some(schedule) = &update.schedule {
        validate_time_slots(schedule)?;
    }
    if update.end_date.is_some_and(|end| end <= existing_start_date) {
        return Err(ValidationFailure::DateOrder);
    }
    Ok(())
}
