//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` implementation for `AppError` lives in
//! `draftroom-core` because Rust's orphan rules require the impl to live
//! in the crate that owns either the trait or the type.

pub use draftroom_core::error::ApiErrorResponse;
