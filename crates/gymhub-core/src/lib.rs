//! # gymhub-core
//!
//! Core crate for GymHub. Contains the document store and clock traits,
//! configuration schemas, typed identifiers, filter/sort/page types used to
//! query documents, UTC time helpers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other GymHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod time;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
