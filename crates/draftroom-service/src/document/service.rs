//! Version store service — document lifecycle and append-only history.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use draftroom_core::error::{AppError, ErrorKind};
use draftroom_core::fingerprint::fingerprint;
use draftroom_core::result::AppResult;
use draftroom_core::types::ListRange;
use draftroom_entity::{
    CreateDocument, Document, DocumentSort, NewVersion, SaveType, Version, VersionTag,
};

use super::store::VersionStore;

/// How often an append is retried after losing a version-number race.
const APPEND_ATTEMPTS: u32 = 3;

/// Commit message stamped on every document's first version.
const INITIAL_COMMIT_MESSAGE: &str = "Initial version";

/// Parameters for saving a new version.
#[derive(Debug, Clone)]
pub struct SaveVersion {
    /// Full text content to save.
    pub content: String,
    /// Optional commit message.
    pub commit_message: Option<String>,
    /// How the save was triggered.
    pub save_type: SaveType,
    /// Author display name.
    pub author: String,
    /// Author user reference, when known.
    pub author_id: Option<Uuid>,
}

/// Result of a save: either a new head or the dedup no-op.
///
/// `Unchanged` is a success, not an error — callers branch on it to return
/// the existing head instead of a fresh row.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    /// A new version was appended and is now the head.
    Created(Version),
    /// Content matched the current head byte-for-byte; nothing was written.
    Unchanged(Version),
}

impl SaveOutcome {
    /// The head version after the save, whichever branch was taken.
    pub fn version(&self) -> &Version {
        match self {
            Self::Created(v) | Self::Unchanged(v) => v,
        }
    }

    /// Consume the outcome, yielding the head version.
    pub fn into_version(self) -> Version {
        match self {
            Self::Created(v) | Self::Unchanged(v) => v,
        }
    }

    /// Whether the save was deduplicated away.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }
}

/// Manages documents and their immutable version history.
///
/// The dedup-then-append sequence in [`create_version`](Self::create_version)
/// is a read-modify-write; a per-document async lock serializes it so
/// `version_number` stays dense, with the storage-level unique constraint
/// (surfaced as `Conflict`) as the backstop.
pub struct VersionService {
    store: Arc<dyn VersionStore>,
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl VersionService {
    /// Create a new version service over a store.
    pub fn new(store: Arc<dyn VersionStore>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, document_id: Uuid) -> Arc<Mutex<()>> {
        self.locks
            .entry(document_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // -- Documents --

    /// Create a document together with version 1.
    pub async fn create_document(
        &self,
        data: CreateDocument,
        initial_content: String,
        author: String,
        author_id: Option<Uuid>,
    ) -> AppResult<(Document, Version)> {
        let initial = NewVersion {
            document_id: Uuid::nil(), // assigned by the store
            version_number: 1,
            content_hash: fingerprint(&initial_content),
            content: initial_content,
            author,
            author_id,
            commit_message: Some(INITIAL_COMMIT_MESSAGE.to_string()),
            save_type: SaveType::Manual,
            parent_version_id: None,
        };

        let (document, version) = self.store.create_document(&data, &initial).await?;

        info!(
            document_id = %document.id,
            title = %document.title,
            "Document created"
        );

        Ok((document, version))
    }

    /// Fetch a document, failing with `NotFound` when absent.
    pub async fn get_document(&self, document_id: Uuid) -> AppResult<Document> {
        self.store
            .find_document(document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {document_id} not found")))
    }

    /// List documents with optional owner and folder filters.
    pub async fn list_documents(
        &self,
        owner_id: Option<Uuid>,
        folder_id: Option<Uuid>,
        sort: DocumentSort,
        range: ListRange,
    ) -> AppResult<Vec<Document>> {
        self.store
            .list_documents(owner_id, folder_id, sort, &range)
            .await
    }

    /// Rename a document.
    pub async fn rename_document(&self, document_id: Uuid, title: &str) -> AppResult<Document> {
        self.store.rename_document(document_id, title).await
    }

    /// Delete a document and, via cascade, its versions and their tags.
    pub async fn delete_document(&self, document_id: Uuid) -> AppResult<()> {
        if !self.store.delete_document(document_id).await? {
            return Err(AppError::not_found(format!(
                "Document {document_id} not found"
            )));
        }
        self.locks.remove(&document_id);
        info!(document_id = %document_id, "Document deleted");
        Ok(())
    }

    // -- Versions --

    /// Save a new version of a document.
    ///
    /// Returns [`SaveOutcome::Unchanged`] without writing anything when the
    /// content fingerprint matches the current head: consecutive saves of
    /// byte-identical content never grow history.
    pub async fn create_version(
        &self,
        document_id: Uuid,
        save: SaveVersion,
    ) -> AppResult<SaveOutcome> {
        let lock = self.lock_for(document_id);
        let _guard = lock.lock().await;

        let content_hash = fingerprint(&save.content);
        let mut last_conflict = None;

        for attempt in 1..=APPEND_ATTEMPTS {
            self.store
                .find_document(document_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Document {document_id} not found")))?;

            let head = self.store.head_version(document_id).await?;
            let (version_number, parent_version_id) = match &head {
                Some(head) => {
                    if head.content_hash == content_hash {
                        debug!(
                            document_id = %document_id,
                            version = head.version_number,
                            "Save deduplicated against current head"
                        );
                        return Ok(SaveOutcome::Unchanged(head.clone()));
                    }
                    (head.version_number + 1, Some(head.id))
                }
                None => (1, None),
            };

            let new = NewVersion {
                document_id,
                version_number,
                content: save.content.clone(),
                content_hash: content_hash.clone(),
                author: save.author.clone(),
                author_id: save.author_id,
                commit_message: save.commit_message.clone(),
                save_type: save.save_type,
                parent_version_id,
            };

            match self.store.append_version(&new).await {
                Ok(version) => {
                    info!(
                        document_id = %document_id,
                        version = version.version_number,
                        save_type = %version.save_type,
                        "Version created"
                    );
                    return Ok(SaveOutcome::Created(version));
                }
                Err(e) if e.is_kind(ErrorKind::Conflict) => {
                    warn!(
                        document_id = %document_id,
                        version = version_number,
                        attempt,
                        "Version number collision, re-reading head"
                    );
                    last_conflict = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_conflict.unwrap_or_else(|| {
            AppError::conflict(format!(
                "Could not append a version to document {document_id}"
            ))
        }))
    }

    /// Fetch a version scoped to a document.
    pub async fn get_version(&self, document_id: Uuid, version_id: Uuid) -> AppResult<Version> {
        self.store
            .find_version(version_id)
            .await?
            .filter(|v| v.document_id == document_id)
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))
    }

    /// Fetch a version by its number within a document.
    pub async fn get_version_by_number(
        &self,
        document_id: Uuid,
        version_number: i32,
    ) -> AppResult<Version> {
        self.store
            .find_version_by_number(document_id, version_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Version {version_number} not found for document {document_id}"
                ))
            })
    }

    /// The current head version of a document.
    pub async fn latest_version(&self, document_id: Uuid) -> AppResult<Version> {
        self.store
            .head_version(document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {document_id} has no versions")))
    }

    /// List versions newest-first, optionally filtered by save type.
    pub async fn list_versions(
        &self,
        document_id: Uuid,
        save_type: Option<SaveType>,
        range: ListRange,
    ) -> AppResult<Vec<Version>> {
        self.store.list_versions(document_id, save_type, &range).await
    }

    /// Restore an old version by appending a new head with its content.
    ///
    /// History is never rewritten: the result is a fresh version whose
    /// content happens to match the target, deduplicated only against the
    /// current head.
    pub async fn restore_version(
        &self,
        document_id: Uuid,
        version_id: Uuid,
    ) -> AppResult<SaveOutcome> {
        let target = self.get_version(document_id, version_id).await?;

        let outcome = self
            .create_version(
                document_id,
                SaveVersion {
                    content: target.content.clone(),
                    commit_message: Some(format!(
                        "Restored from version {}",
                        target.version_number
                    )),
                    save_type: SaveType::Manual,
                    author: target.author.clone(),
                    author_id: target.author_id,
                },
            )
            .await?;

        info!(
            document_id = %document_id,
            restored_from = target.version_number,
            new_version = outcome.version().version_number,
            "Version restored"
        );

        Ok(outcome)
    }

    // -- Tags --

    /// Attach a tag to a version, failing with `NotFound` when the version
    /// is absent.
    pub async fn create_tag(
        &self,
        version_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<VersionTag> {
        self.store
            .find_version(version_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Version {version_id} not found")))?;

        self.store.insert_tag(version_id, name, description).await
    }

    /// List all tags of a version.
    pub async fn list_tags(&self, version_id: Uuid) -> AppResult<Vec<VersionTag>> {
        self.store.list_tags(version_id).await
    }

    /// Delete a tag.
    pub async fn delete_tag(&self, tag_id: Uuid) -> AppResult<()> {
        if !self.store.delete_tag(tag_id).await? {
            return Err(AppError::not_found(format!("Tag {tag_id} not found")));
        }
        Ok(())
    }
}
