//! # draftroom-api
//!
//! HTTP and WebSocket boundary for Draftroom: the Axum router, request
//! handlers, DTOs, extractors, and middleware. Everything here is thin
//! marshaling over the services; the invariants live below this layer.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
