//! # gymhub-service
//!
//! Business logic service layer for GymHub. Services apply the booking,
//! availability and messaging rules in [`validation`], persist through the
//! repositories of `gymhub-database`, and delegate account flows to the
//! identity provider.
//!
//! Services follow constructor injection: repositories, the clock and the
//! [`ServiceObserver`] are provided at construction time via `Arc`.

pub mod auth;
pub mod availability;
pub mod booking;
pub mod context;
pub mod message;
pub mod observer;
pub mod validation;

#[cfg(test)]
mod testing;

pub use auth::AuthService;
pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use context::RequestContext;
pub use message::MessageService;
pub use observer::{ServiceObserver, TracingObserver};
pub use validation::ValidationFailure;
