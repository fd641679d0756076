//! Booking domain entities.

pub mod change;
pub mod model;
pub mod status;

pub use change::{BookingChange, ChangeType};
pub use model::{Booking, CreateBooking, UpdateBooking};
pub use status::BookingStatus;
