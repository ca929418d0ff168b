//! Query parameter extractors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use draftroom_core::AppResult;
use draftroom_core::types::ListRange;
use draftroom_diff::{DiffMode, DiffOptions};
use draftroom_entity::{DocumentSort, SaveType};

/// Query parameters for document listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListQuery {
    /// Records to skip.
    #[serde(default)]
    pub skip: i64,
    /// Maximum records to return.
    #[serde(default = "default_document_limit")]
    pub limit: i64,
    /// Sort field: updated_at, created_at, or title.
    pub sort_by: Option<String>,
    /// Filter by owner.
    pub owner_id: Option<Uuid>,
    /// Filter by folder.
    pub folder_id: Option<Uuid>,
}

impl DocumentListQuery {
    /// The clamped skip/limit window.
    pub fn range(&self) -> ListRange {
        ListRange::new(self.skip, self.limit)
    }

    /// The parsed sort order.
    pub fn sort(&self) -> AppResult<DocumentSort> {
        match &self.sort_by {
            Some(field) => field.parse(),
            None => Ok(DocumentSort::default()),
        }
    }
}

/// Query parameters for version listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionListQuery {
    /// Records to skip.
    #[serde(default)]
    pub skip: i64,
    /// Maximum records to return.
    #[serde(default = "default_version_limit")]
    pub limit: i64,
    /// Filter by save type: manual, auto, or draft.
    pub save_type: Option<String>,
}

impl VersionListQuery {
    /// The clamped skip/limit window.
    pub fn range(&self) -> ListRange {
        ListRange::new(self.skip, self.limit)
    }

    /// The parsed save-type filter.
    pub fn save_type(&self) -> AppResult<Option<SaveType>> {
        self.save_type
            .as_deref()
            .map(str::parse)
            .transpose()
    }
}

/// Query parameters for diff endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffQuery {
    /// Diff granularity: character, word, line, or semantic.
    pub diff_mode: Option<String>,
    /// Collapse whitespace runs before diffing.
    #[serde(default)]
    pub ignore_whitespace: bool,
    /// Lowercase both inputs before diffing.
    #[serde(default)]
    pub ignore_case: bool,
}

impl DiffQuery {
    /// The parsed engine options.
    pub fn options(&self) -> AppResult<DiffOptions> {
        let mode = match &self.diff_mode {
            Some(mode) => mode.parse()?,
            None => DiffMode::default(),
        };
        Ok(DiffOptions {
            mode,
            ignore_whitespace: self.ignore_whitespace,
            ignore_case: self.ignore_case,
        })
    }
}

fn default_document_limit() -> i64 {
    20
}

fn default_version_limit() -> i64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_query_defaults_to_semantic() {
        let query = DiffQuery {
            diff_mode: None,
            ignore_whitespace: false,
            ignore_case: false,
        };
        assert_eq!(query.options().unwrap().mode, DiffMode::Semantic);
    }

    #[test]
    fn test_diff_query_rejects_unknown_mode() {
        let query = DiffQuery {
            diff_mode: Some("paragraph".to_string()),
            ignore_whitespace: false,
            ignore_case: false,
        };
        assert!(query.options().is_err());
    }

    #[test]
    fn test_version_query_save_type() {
        let query = VersionListQuery {
            skip: 0,
            limit: 10,
            save_type: Some("auto".to_string()),
        };
        assert_eq!(query.save_type().unwrap(), Some(SaveType::Auto));

        let query = VersionListQuery {
            skip: 0,
            limit: 10,
            save_type: Some("bogus".to_string()),
        };
        assert!(query.save_type().is_err());
    }
}
