//! Version tag entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named label attached to a version.
///
/// Many tags may reference one version; a tag is deleted on its own or via
/// cascade when its version goes away.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VersionTag {
    /// Unique tag identifier.
    pub id: Uuid,
    /// The tagged version.
    pub version_id: Uuid,
    /// Short label.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// When the tag was created.
    pub created_at: DateTime<Utc>,
}
