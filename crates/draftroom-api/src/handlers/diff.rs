//! Version comparison handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use draftroom_core::error::AppError;

use crate::dto::response::DiffResponse;
use crate::extractors::DiffQuery;
use crate::state::AppState;

/// GET /api/diff/{old_id}/{new_id}
pub async fn compare_versions(
    State(state): State<AppState>,
    Path((old_version_id, new_version_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<DiffQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let options = query.options()?;
    let diff = state
        .diffs
        .compare(old_version_id, new_version_id, &options)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": DiffResponse::from(diff)
    })))
}

/// GET /api/diff/documents/{id}/numbers/{old_n}/{new_n}
pub async fn compare_versions_by_number(
    State(state): State<AppState>,
    Path((document_id, old_number, new_number)): Path<(Uuid, i32, i32)>,
    Query(query): Query<DiffQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let options = query.options()?;
    let diff = state
        .diffs
        .compare_numbers(document_id, old_number, new_number, &options)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": DiffResponse::from(diff)
    })))
}

/// GET /api/diff/documents/{id}/latest/{version_id}
pub async fn compare_with_latest(
    State(state): State<AppState>,
    Path((document_id, version_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<DiffQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let options = query.options()?;
    let diff = state
        .diffs
        .compare_with_latest(document_id, version_id, &options)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": DiffResponse::from(diff)
    })))
}
