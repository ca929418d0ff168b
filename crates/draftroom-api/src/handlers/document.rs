//! Document CRUD handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use draftroom_core::error::AppError;
use draftroom_entity::CreateDocument;

use crate::dto::request::{CreateDocumentRequest, UpdateDocumentRequest, author_or_anonymous};
use crate::extractors::DocumentListQuery;
use crate::state::AppState;

/// POST /api/documents
pub async fn create_document(
    State(state): State<AppState>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let (document, _) = state
        .versions
        .create_document(
            CreateDocument {
                title: request.title,
                owner_id: request.author_id,
                folder_id: request.folder_id,
            },
            request.initial_content,
            author_or_anonymous(request.author),
            request.author_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": document })),
    ))
}

/// GET /api/documents
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<DocumentListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let documents = state
        .versions
        .list_documents(query.owner_id, query.folder_id, query.sort()?, query.range())
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": documents })))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let document = state.versions.get_document(id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": document })))
}

/// PUT /api/documents/{id}
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDocumentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let document = state.versions.rename_document(id, &request.title).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": document })))
}

/// DELETE /api/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.versions.delete_document(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Document deleted"
    })))
}
