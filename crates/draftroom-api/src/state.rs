//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use draftroom_core::config::AppConfig;
use draftroom_realtime::CollabHub;
use draftroom_service::{DiffService, VersionService};

use crate::middleware::throttle::ThrottleLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped (or internally pooled) for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db: PgPool,
    /// Version store service.
    pub versions: Arc<VersionService>,
    /// Diff service.
    pub diffs: Arc<DiffService>,
    /// Collaboration hub.
    pub hub: Arc<CollabHub>,
    /// Write-endpoint throttle.
    pub throttle: Arc<ThrottleLimiter>,
}
