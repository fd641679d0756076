//! Trainer availability patterns.

pub mod service;

pub use service::AvailabilityService;
