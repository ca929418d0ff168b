//! Document repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use draftroom_core::error::{AppError, ErrorKind};
use draftroom_core::result::AppResult;
use draftroom_core::types::ListRange;
use draftroom_entity::{CreateDocument, Document, DocumentSort, NewVersion, Version};

/// Repository for document CRUD and query operations.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a document together with its initial version.
    ///
    /// Both rows are written in one transaction so a document can never
    /// exist without at least one version.
    pub async fn create_with_initial_version(
        &self,
        data: &CreateDocument,
        initial: &NewVersion,
    ) -> AppResult<(Document, Version)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let document = sqlx::query_as::<_, Document>(
            "INSERT INTO documents (title, owner_id, folder_id, current_version_number) \
             VALUES ($1, $2, $3, 1) RETURNING *",
        )
        .bind(&data.title)
        .bind(data.owner_id)
        .bind(data.folder_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create document", e))?;

        let version = sqlx::query_as::<_, Version>(
            "INSERT INTO versions (document_id, version_number, content, content_hash, \
             author, author_id, commit_message, save_type, parent_version_id) \
             VALUES ($1, 1, $2, $3, $4, $5, $6, $7, NULL) RETURNING *",
        )
        .bind(document.id)
        .bind(&initial.content)
        .bind(&initial.content_hash)
        .bind(&initial.author)
        .bind(initial.author_id)
        .bind(&initial.commit_message)
        .bind(initial.save_type)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create initial version", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit document create", e)
        })?;

        Ok((document, version))
    }

    /// Find a document by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// List documents, optionally filtered by owner and folder.
    pub async fn list(
        &self,
        owner_id: Option<Uuid>,
        folder_id: Option<Uuid>,
        sort: DocumentSort,
        range: &ListRange,
    ) -> AppResult<Vec<Document>> {
        let query = format!(
            "SELECT * FROM documents \
             WHERE ($1::uuid IS NULL OR owner_id = $1) \
             AND ($2::uuid IS NULL OR folder_id = $2) \
             ORDER BY {} LIMIT $3 OFFSET $4",
            sort.order_by()
        );

        sqlx::query_as::<_, Document>(&query)
            .bind(owner_id)
            .bind(folder_id)
            .bind(range.limit())
            .bind(range.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    /// Rename a document.
    pub async fn rename(&self, id: Uuid, title: &str) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET title = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename document", e))?
        .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    /// Delete a document. Versions and their tags go with it via cascade.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
