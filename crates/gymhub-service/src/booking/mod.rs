//! Member bookings.

pub mod service;

pub use service::BookingService;
