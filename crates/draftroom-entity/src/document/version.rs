//! Immutable document version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::save_type::SaveType;

/// One immutable snapshot in a document's append-only history.
///
/// Versions are never mutated after creation; they disappear only through
/// the cascade when the owning document is deleted. `parent_version_id`
/// points at the head the version was appended onto and exists for audit —
/// the head is always looked up by the highest `version_number`, never by
/// walking the parent chain.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Version {
    /// Unique version identifier.
    pub id: Uuid,
    /// The document this version belongs to.
    pub document_id: Uuid,
    /// Sequential version number (1-based, dense, never reused).
    pub version_number: i32,
    /// Full text content of this version.
    pub content: String,
    /// SHA-256 hex fingerprint of the content, used for save dedup.
    pub content_hash: String,
    /// Display name of the author.
    pub author: String,
    /// Author user reference, when known.
    pub author_id: Option<Uuid>,
    /// Optional commit message describing the change.
    pub commit_message: Option<String>,
    /// How this version was saved.
    pub save_type: SaveType,
    /// The head version this one was appended onto (audit only).
    pub parent_version_id: Option<Uuid>,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVersion {
    /// The document to append to.
    pub document_id: Uuid,
    /// The version number to claim (head + 1).
    pub version_number: i32,
    /// Full text content.
    pub content: String,
    /// Content fingerprint.
    pub content_hash: String,
    /// Author display name.
    pub author: String,
    /// Author user reference.
    pub author_id: Option<Uuid>,
    /// Commit message.
    pub commit_message: Option<String>,
    /// Save type.
    pub save_type: SaveType,
    /// The head this version is appended onto.
    pub parent_version_id: Option<Uuid>,
}
