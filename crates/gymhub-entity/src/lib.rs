//! # gymhub-entity
//!
//! Domain entity models for GymHub. Every struct in this crate is either a
//! persisted record (booking, availability, message) or a domain value
//! object. All entities derive `Debug`, `Clone`, `Serialize` and
//! `Deserialize`; their serde shape is the JSON wire format of the API.
//! Storage documents live in `gymhub-database`.

pub mod availability;
pub mod booking;
pub mod message;
pub mod user;
