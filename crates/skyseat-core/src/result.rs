//! Convenience result type alias for SkySeat.

use crate::error::AppError;

/// A specialized `Result` type for SkySeat operations.
pub type AppResult<T> = Result<T, AppError>;
