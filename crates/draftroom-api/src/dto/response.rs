//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use draftroom_diff::{Change, DiffStats};
use draftroom_entity::{SaveType, Version};
use draftroom_service::VersionDiff;

/// Version list item without the (potentially large) content payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionListItem {
    /// Version ID.
    pub id: Uuid,
    /// Sequential version number.
    pub version_number: i32,
    /// When the version was created.
    pub created_at: DateTime<Utc>,
    /// Author display name.
    pub author: String,
    /// Commit message.
    pub commit_message: Option<String>,
    /// Save type.
    pub save_type: SaveType,
    /// Content length in characters.
    pub content_length: usize,
}

impl From<&Version> for VersionListItem {
    fn from(version: &Version) -> Self {
        Self {
            id: version.id,
            version_number: version.version_number,
            created_at: version.created_at,
            author: version.author.clone(),
            commit_message: version.commit_message.clone(),
            save_type: version.save_type,
            content_length: version.content.chars().count(),
        }
    }
}

/// Diff response: the compared versions plus the engine output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffResponse {
    /// Older version ID.
    pub old_version_id: Uuid,
    /// Newer version ID.
    pub new_version_id: Uuid,
    /// Older version number.
    pub old_version_number: i32,
    /// Newer version number.
    pub new_version_number: i32,
    /// Ordered change segments.
    pub changes: Vec<Change>,
    /// Aggregate counts.
    pub stats: DiffStats,
}

impl From<VersionDiff> for DiffResponse {
    fn from(diff: VersionDiff) -> Self {
        Self {
            old_version_id: diff.old_version.id,
            new_version_id: diff.new_version.id,
            old_version_number: diff.old_version.version_number,
            new_version_number: diff.new_version.version_number,
            changes: diff.report.changes,
            stats: diff.report.stats,
        }
    }
}

/// Compact version summary embedded in `version_saved` events.
pub fn version_summary(version: &Version) -> serde_json::Value {
    serde_json::json!({
        "id": version.id,
        "version_number": version.version_number,
        "author": version.author,
        "commit_message": version.commit_message,
        "save_type": version.save_type,
        "created_at": version.created_at,
    })
}
