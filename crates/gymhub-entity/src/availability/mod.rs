//! Trainer availability domain entities.

pub mod model;
pub mod recurrence;
pub mod schedule;

pub use model::{Availability, CreateAvailability, UpdateAvailability};
pub use recurrence::RecurrenceType;
pub use schedule::{DaySchedule, TimeSlot};
