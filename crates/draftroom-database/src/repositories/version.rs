//! Version and tag repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use draftroom_core::error::{AppError, ErrorKind};
use draftroom_core::result::AppResult;
use draftroom_core::types::ListRange;
use draftroom_entity::{NewVersion, SaveType, Version, VersionTag};

/// Name of the unique constraint guarding `(document_id, version_number)`.
const VERSION_NUMBER_KEY: &str = "versions_document_id_version_number_key";

/// Repository for version history and tag operations.
#[derive(Debug, Clone)]
pub struct VersionRepository {
    pool: PgPool,
}

impl VersionRepository {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The current head version (highest version number), if any.
    pub async fn head(&self, document_id: Uuid) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>(
            "SELECT * FROM versions WHERE document_id = $1 \
             ORDER BY version_number DESC LIMIT 1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find head version", e))
    }

    /// Find a version by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>("SELECT * FROM versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    /// Find a version by document and version number.
    pub async fn find_by_number(
        &self,
        document_id: Uuid,
        version_number: i32,
    ) -> AppResult<Option<Version>> {
        sqlx::query_as::<_, Version>(
            "SELECT * FROM versions WHERE document_id = $1 AND version_number = $2",
        )
        .bind(document_id)
        .bind(version_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find version by number", e)
        })
    }

    /// List versions newest-first, optionally filtered by save type.
    pub async fn list(
        &self,
        document_id: Uuid,
        save_type: Option<SaveType>,
        range: &ListRange,
    ) -> AppResult<Vec<Version>> {
        sqlx::query_as::<_, Version>(
            "SELECT * FROM versions WHERE document_id = $1 \
             AND ($2::save_type IS NULL OR save_type = $2) \
             ORDER BY version_number DESC LIMIT $3 OFFSET $4",
        )
        .bind(document_id)
        .bind(save_type)
        .bind(range.limit())
        .bind(range.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    /// Append a version and advance the document head in one transaction.
    ///
    /// A `(document_id, version_number)` collision — two writers racing on
    /// the same head — surfaces as a `Conflict` so the caller can re-read
    /// the head and retry.
    pub async fn append(&self, new: &NewVersion) -> AppResult<Version> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let version = sqlx::query_as::<_, Version>(
            "INSERT INTO versions (document_id, version_number, content, content_hash, \
             author, author_id, commit_message, save_type, parent_version_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(new.document_id)
        .bind(new.version_number)
        .bind(&new.content)
        .bind(&new.content_hash)
        .bind(&new.author)
        .bind(new.author_id)
        .bind(&new.commit_message)
        .bind(new.save_type)
        .bind(new.parent_version_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(VERSION_NUMBER_KEY) =>
            {
                AppError::conflict(format!(
                    "Version {} already exists for document {}",
                    new.version_number, new.document_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to append version", e),
        })?;

        sqlx::query(
            "UPDATE documents SET current_version_number = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(new.document_id)
        .bind(new.version_number)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to advance head", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit version append", e)
        })?;

        Ok(version)
    }

    // -- Tags --

    /// Attach a tag to a version.
    pub async fn insert_tag(
        &self,
        version_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<VersionTag> {
        sqlx::query_as::<_, VersionTag>(
            "INSERT INTO version_tags (version_id, name, description) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(version_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create tag", e))
    }

    /// List all tags of a version.
    pub async fn list_tags(&self, version_id: Uuid) -> AppResult<Vec<VersionTag>> {
        sqlx::query_as::<_, VersionTag>(
            "SELECT * FROM version_tags WHERE version_id = $1 ORDER BY created_at ASC",
        )
        .bind(version_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tags", e))
    }

    /// Delete a tag.
    pub async fn delete_tag(&self, tag_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM version_tags WHERE id = $1")
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete tag", e))?;
        Ok(result.rows_affected() > 0)
    }
}
