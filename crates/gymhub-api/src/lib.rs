//! # gymhub-api
//!
//! HTTP API layer for GymHub built on Axum.
//!
//! Provides the REST endpoints for bookings, trainer availability, inbox
//! messages and account flows, plus middleware (CORS, logging), extractors,
//! DTOs, and error mapping. Access checks run here, before service calls.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
