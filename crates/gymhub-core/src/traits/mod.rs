//! Core traits defined in `gymhub-core` and implemented by other crates.

pub mod clock;
pub mod document_store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use document_store::{DocumentQuery, DocumentStore};
