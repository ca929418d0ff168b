//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use draftroom_core::AppError;

/// A document managed by Draftroom.
///
/// `current_version_number` is the head pointer: it always equals the
/// `version_number` of the most recently committed version and starts at 1
/// (set by the initial version created together with the document).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// Document title.
    pub title: String,
    /// The owning user, when known.
    pub owner_id: Option<Uuid>,
    /// The folder containing this document, if any.
    pub folder_id: Option<Uuid>,
    /// Version number of the current head.
    pub current_version_number: i32,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated (head advance or rename).
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new document record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// Document title.
    pub title: String,
    /// The owning user, when known.
    pub owner_id: Option<Uuid>,
    /// The folder to place the document in.
    pub folder_id: Option<Uuid>,
}

/// Sort order for document listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSort {
    /// Most recently updated first.
    UpdatedAt,
    /// Most recently created first.
    CreatedAt,
    /// Alphabetical by title.
    Title,
}

impl DocumentSort {
    /// The `ORDER BY` clause for this sort order.
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::UpdatedAt => "updated_at DESC",
            Self::CreatedAt => "created_at DESC",
            Self::Title => "title ASC",
        }
    }
}

impl Default for DocumentSort {
    fn default() -> Self {
        Self::UpdatedAt
    }
}

impl std::str::FromStr for DocumentSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "updated_at" => Ok(Self::UpdatedAt),
            "created_at" => Ok(Self::CreatedAt),
            "title" => Ok(Self::Title),
            _ => Err(AppError::validation(format!(
                "Invalid sort field: '{s}'. Expected one of: updated_at, created_at, title"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_from_str() {
        assert_eq!(
            "title".parse::<DocumentSort>().unwrap(),
            DocumentSort::Title
        );
        assert!("size".parse::<DocumentSort>().is_err());
    }
}
