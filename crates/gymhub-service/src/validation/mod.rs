//! Pure domain rules for bookings, availabilities and messages.

pub mod availability;
pub mod booking;
pub mod error;
pub mod message;

pub use error::ValidationFailure;
