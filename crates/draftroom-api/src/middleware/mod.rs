//! HTTP middleware.

pub mod logging;
pub mod throttle;
