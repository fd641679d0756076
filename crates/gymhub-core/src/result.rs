//! Convenience result type alias for GymHub.

use crate::error::AppError;

/// A specialized `Result` type for GymHub operations.
pub type AppResult<T> = Result<T, AppError>;
