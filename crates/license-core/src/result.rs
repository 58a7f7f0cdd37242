//! Convenience result type alias for the license server.

use crate::error::AppError;

/// A specialized `Result` type for license operations.
pub type AppResult<T> = Result<T, AppError>;
