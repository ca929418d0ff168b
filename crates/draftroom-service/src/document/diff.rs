//! Diff service — resolves version pairs and runs the diff engine.

use std::sync::Arc;

use uuid::Uuid;

use draftroom_core::AppError;
use draftroom_core::result::AppResult;
use draftroom_diff::{DiffOptions, DiffReport, compute};
use draftroom_entity::Version;

use super::store::VersionStore;

/// A computed diff together with the versions it compares.
#[derive(Debug, Clone)]
pub struct VersionDiff {
    /// The older side of the comparison.
    pub old_version: Version,
    /// The newer side of the comparison.
    pub new_version: Version,
    /// Engine output.
    pub report: DiffReport,
}

/// Loads version contents and hands them to the diff engine.
///
/// The engine itself is stateless; this service only does the storage
/// lookups and the cross-document guard.
pub struct DiffService {
    store: Arc<dyn VersionStore>,
}

impl DiffService {
    /// Create a new diff service over a store.
    pub fn new(store: Arc<dyn VersionStore>) -> Self {
        Self { store }
    }

    async fn load_version(&self, version_id: Uuid) -> AppResult<Version> {
        self.store
            .find_version(version_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))
    }

    /// Compare two versions by ID.
    ///
    /// Fails with `NotFound` when either version is absent or the two
    /// belong to different documents.
    pub async fn compare(
        &self,
        old_version_id: Uuid,
        new_version_id: Uuid,
        options: &DiffOptions,
    ) -> AppResult<VersionDiff> {
        let old_version = self.load_version(old_version_id).await?;
        let new_version = self.load_version(new_version_id).await?;

        if old_version.document_id != new_version.document_id {
            return Err(AppError::not_found(
                "Versions belong to different documents",
            ));
        }

        let report = compute(&old_version.content, &new_version.content, options);
        Ok(VersionDiff {
            old_version,
            new_version,
            report,
        })
    }

    /// Compare two versions of one document by number.
    pub async fn compare_numbers(
        &self,
        document_id: Uuid,
        old_number: i32,
        new_number: i32,
        options: &DiffOptions,
    ) -> AppResult<VersionDiff> {
        let old_version = self
            .store
            .find_version_by_number(document_id, old_number)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Version {old_number} not found")))?;
        let new_version = self
            .store
            .find_version_by_number(document_id, new_number)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Version {new_number} not found")))?;

        let report = compute(&old_version.content, &new_version.content, options);
        Ok(VersionDiff {
            old_version,
            new_version,
            report,
        })
    }

    /// Compare a version against the document's current head.
    ///
    /// Comparing the head to itself yields an empty report.
    pub async fn compare_with_latest(
        &self,
        document_id: Uuid,
        version_id: Uuid,
        options: &DiffOptions,
    ) -> AppResult<VersionDiff> {
        let old_version = self
            .store
            .find_version(version_id)
            .await?
            .filter(|v| v.document_id == document_id)
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))?;

        let head = self
            .store
            .head_version(document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {document_id} has no versions")))?;

        let report = if old_version.id == head.id {
            DiffReport::empty()
        } else {
            compute(&old_version.content, &head.content, options)
        };

        Ok(VersionDiff {
            old_version,
            new_version: head,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::service::{SaveVersion, VersionService};
    use crate::document::store::memory::MemoryStore;
    use draftroom_core::error::ErrorKind;
    use draftroom_diff::{ChangeKind, DiffMode};
    use draftroom_entity::{CreateDocument, SaveType};

    async fn setup() -> (Arc<VersionService>, DiffService, Uuid) {
        let store: Arc<dyn VersionStore> = Arc::new(MemoryStore::new());
        let versions = Arc::new(VersionService::new(Arc::clone(&store)));
        let diffs = DiffService::new(store);
        let (document, _) = versions
            .create_document(
                CreateDocument {
                    title: "Notes".to_string(),
                    owner_id: None,
                    folder_id: None,
                },
                "line1\nline2\nline3\n".to_string(),
                "alice".to_string(),
                None,
            )
            .await
            .unwrap();
        (versions, diffs, document.id)
    }

    fn save(content: &str) -> SaveVersion {
        SaveVersion {
            content: content.to_string(),
            commit_message: None,
            save_type: SaveType::Manual,
            author: "alice".to_string(),
            author_id: None,
        }
    }

    #[tokio::test]
    async fn test_compare_by_number() {
        let (versions, diffs, document_id) = setup().await;
        versions
            .create_version(document_id, save("line1\nlineTWO\nline3\n"))
            .await
            .unwrap();

        let options = DiffOptions {
            mode: DiffMode::Line,
            ..DiffOptions::default()
        };
        let diff = diffs
            .compare_numbers(document_id, 1, 2, &options)
            .await
            .unwrap();

        assert_eq!(diff.old_version.version_number, 1);
        assert_eq!(diff.new_version.version_number, 2);
        assert_eq!(diff.report.stats.modified, 1);
        assert_eq!(diff.report.stats.unchanged, 2);
    }

    #[tokio::test]
    async fn test_cross_document_pair_rejected() {
        let (versions, diffs, document_id) = setup().await;
        let head_a = versions.latest_version(document_id).await.unwrap();

        let (other, _) = versions
            .create_document(
                CreateDocument {
                    title: "Other".to_string(),
                    owner_id: None,
                    folder_id: None,
                },
                "unrelated".to_string(),
                "bob".to_string(),
                None,
            )
            .await
            .unwrap();
        let head_b = versions.latest_version(other.id).await.unwrap();

        let err = diffs
            .compare(head_a.id, head_b.id, &DiffOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_kind(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_compare_with_latest_same_version_is_empty() {
        let (versions, diffs, document_id) = setup().await;
        let head = versions.latest_version(document_id).await.unwrap();

        let diff = diffs
            .compare_with_latest(document_id, head.id, &DiffOptions::default())
            .await
            .unwrap();
        assert!(diff.report.changes.is_empty());
        assert_eq!(diff.report.stats, Default::default());
    }

    #[tokio::test]
    async fn test_restore_roundtrip_diff_shows_replacement() {
        let (versions, diffs, document_id) = setup().await;
        let v1 = versions.latest_version(document_id).await.unwrap();
        let v2 = versions
            .create_version(document_id, save("entirely different\n"))
            .await
            .unwrap()
            .into_version();

        // Restoring v1 appends v3 carrying v1's content.
        let v3 = versions
            .restore_version(document_id, v1.id)
            .await
            .unwrap()
            .into_version();
        assert_eq!(v3.content, v1.content);

        let options = DiffOptions {
            mode: DiffMode::Line,
            ..DiffOptions::default()
        };
        let diff = diffs.compare(v2.id, v3.id, &options).await.unwrap();
        assert_eq!(diff.report.stats.unchanged, 0);
        assert!(
            diff.report
                .changes
                .iter()
                .all(|c| c.kind != ChangeKind::Unchanged)
        );
        // Old side is v2's text, new side is the restored v1 text.
        let old: String = diff
            .report
            .changes
            .iter()
            .filter_map(|c| c.old_text.clone())
            .collect();
        let new: String = diff
            .report
            .changes
            .iter()
            .filter_map(|c| c.new_text.clone())
            .collect();
        assert_eq!(old, v2.content);
        assert_eq!(new, v1.content);
    }
}
