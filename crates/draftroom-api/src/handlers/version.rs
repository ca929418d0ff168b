//! Version history and tag handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use draftroom_core::error::AppError;
use draftroom_service::{SaveOutcome, SaveVersion};

use crate::dto::request::{CreateTagRequest, CreateVersionRequest, author_or_anonymous};
use crate::dto::response::{VersionListItem, version_summary};
use crate::extractors::VersionListQuery;
use crate::state::AppState;

/// Shape a save outcome into a response, announcing new heads to the
/// document's live connections.
fn respond_to_save(
    state: &AppState,
    document_id: Uuid,
    outcome: SaveOutcome,
) -> (StatusCode, Json<serde_json::Value>) {
    match outcome {
        SaveOutcome::Created(version) => {
            state
                .hub
                .broadcast_save_event(document_id, version_summary(&version), &version.author);
            (
                StatusCode::CREATED,
                Json(serde_json::json!({
                    "success": true,
                    "unchanged": false,
                    "data": version
                })),
            )
        }
        SaveOutcome::Unchanged(head) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "unchanged": true,
                "data": head
            })),
        ),
    }
}

/// POST /api/documents/{id}/versions
pub async fn create_version(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    Json(request): Json<CreateVersionRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let outcome = state
        .versions
        .create_version(
            document_id,
            SaveVersion {
                content: request.content,
                commit_message: request.commit_message,
                save_type: request.save_type,
                author: author_or_anonymous(request.author),
                author_id: request.author_id,
            },
        )
        .await?;

    Ok(respond_to_save(&state, document_id, outcome))
}

/// GET /api/documents/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
    Query(query): Query<VersionListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let versions = state
        .versions
        .list_versions(document_id, query.save_type()?, query.range())
        .await?;

    let items: Vec<VersionListItem> = versions.iter().map(VersionListItem::from).collect();
    Ok(Json(serde_json::json!({ "success": true, "data": items })))
}

/// GET /api/documents/{id}/versions/{version_id}
pub async fn get_version(
    State(state): State<AppState>,
    Path((document_id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let version = state.versions.get_version(document_id, version_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": version })))
}

/// GET /api/documents/{id}/versions/number/{n}
pub async fn get_version_by_number(
    State(state): State<AppState>,
    Path((document_id, version_number)): Path<(Uuid, i32)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let version = state
        .versions
        .get_version_by_number(document_id, version_number)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": version })))
}

/// POST /api/documents/{id}/restore/{version_id}
pub async fn restore_version(
    State(state): State<AppState>,
    Path((document_id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let outcome = state
        .versions
        .restore_version(document_id, version_id)
        .await?;

    Ok(respond_to_save(&state, document_id, outcome))
}

/// POST /api/documents/{id}/versions/{version_id}/tags
pub async fn create_tag(
    State(state): State<AppState>,
    Path((_document_id, version_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let tag = state
        .versions
        .create_tag(version_id, &request.name, request.description.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": tag })),
    ))
}

/// GET /api/documents/{id}/versions/{version_id}/tags
pub async fn list_tags(
    State(state): State<AppState>,
    Path((_document_id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tags = state.versions.list_tags(version_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": tags })))
}

/// DELETE /api/tags/{tag_id}
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.versions.delete_tag(tag_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Tag deleted"
    })))
}
