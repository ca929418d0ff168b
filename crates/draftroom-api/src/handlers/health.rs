//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// GET /api/health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/health/detailed
pub async fn detailed_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(1) => "up",
        _ => "down",
    };

    Json(serde_json::json!({
        "status": if database == "up" { "ok" } else { "degraded" },
        "database": database,
    }))
}
