//! Repositories over the document store, one per persisted entity.

pub mod availability;
pub mod booking;
pub mod message;

pub use availability::AvailabilityRepository;
pub use booking::BookingRepository;
pub use message::MessageRepository;
