//! Convenience result type alias for Workbench.

use crate::error::AppError;

/// A specialized `Result` type for Workbench operations.
pub type AppResult<T> = Result<T, AppError>;
