//! Core type definitions used across the GymHub workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod sorting;

pub use filter::{FilterExpr, FilterField, FilterOp, FilterValue};
pub use id::*;
pub use pagination::PageRequest;
pub use sorting::{SortDirection, SortField};
