//! Result alias used across the workspace.

use crate::error::AppError;

/// `Result` pinned to [`AppError`], the error type every fallible
/// Draftroom operation returns.
pub type AppResult<T> = Result<T, AppError>;
