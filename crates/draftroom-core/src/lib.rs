//! # draftroom-core
//!
//! Core crate for Draftroom. Contains configuration schemas, shared list
//! types, content fingerprinting, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Draftroom crates.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
