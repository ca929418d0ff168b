//! Storage seam for the version service.
//!
//! The trait captures exactly the persistence operations the version and
//! diff services need, so the invariant logic can be exercised against an
//! in-memory double while production runs on PostgreSQL.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use draftroom_core::result::AppResult;
use draftroom_core::types::ListRange;
use draftroom_database::repositories::document::DocumentRepository;
use draftroom_database::repositories::version::VersionRepository;
use draftroom_entity::{
    CreateDocument, Document, DocumentSort, NewVersion, SaveType, Version, VersionTag,
};

/// Persistence operations backing the version service.
#[async_trait]
pub trait VersionStore: Send + Sync + 'static {
    /// Create a document together with version 1, atomically.
    async fn create_document(
        &self,
        data: &CreateDocument,
        initial: &NewVersion,
    ) -> AppResult<(Document, Version)>;

    /// Find a document by ID.
    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<Document>>;

    /// List documents with optional owner/folder filters.
    async fn list_documents(
        &self,
        owner_id: Option<Uuid>,
        folder_id: Option<Uuid>,
        sort: DocumentSort,
        range: &ListRange,
    ) -> AppResult<Vec<Document>>;

    /// Rename a document.
    async fn rename_document(&self, document_id: Uuid, title: &str) -> AppResult<Document>;

    /// Delete a document, cascading to versions and tags.
    async fn delete_document(&self, document_id: Uuid) -> AppResult<bool>;

    /// The current head version of a document.
    async fn head_version(&self, document_id: Uuid) -> AppResult<Option<Version>>;

    /// Append a version and advance the head. Duplicate
    /// `(document_id, version_number)` pairs must surface as `Conflict`.
    async fn append_version(&self, new: &NewVersion) -> AppResult<Version>;

    /// Find a version by ID.
    async fn find_version(&self, version_id: Uuid) -> AppResult<Option<Version>>;

    /// Find a version by document and number.
    async fn find_version_by_number(
        &self,
        document_id: Uuid,
        version_number: i32,
    ) -> AppResult<Option<Version>>;

    /// List versions newest-first.
    async fn list_versions(
        &self,
        document_id: Uuid,
        save_type: Option<SaveType>,
        range: &ListRange,
    ) -> AppResult<Vec<Version>>;

    /// Attach a tag to a version.
    async fn insert_tag(
        &self,
        version_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<VersionTag>;

    /// List all tags of a version.
    async fn list_tags(&self, version_id: Uuid) -> AppResult<Vec<VersionTag>>;

    /// Delete a tag.
    async fn delete_tag(&self, tag_id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed store delegating to the repositories.
#[derive(Debug, Clone)]
pub struct SqlVersionStore {
    documents: Arc<DocumentRepository>,
    versions: Arc<VersionRepository>,
}

impl SqlVersionStore {
    /// Create a store over the two repositories.
    pub fn new(documents: Arc<DocumentRepository>, versions: Arc<VersionRepository>) -> Self {
        Self {
            documents,
            versions,
        }
    }
}

#[async_trait]
impl VersionStore for SqlVersionStore {
    async fn create_document(
        &self,
        data: &CreateDocument,
        initial: &NewVersion,
    ) -> AppResult<(Document, Version)> {
        self.documents
            .create_with_initial_version(data, initial)
            .await
    }

    async fn find_document(&self, document_id: Uuid) -> AppResult<Option<Document>> {
        self.documents.find_by_id(document_id).await
    }

    async fn list_documents(
        &self,
        owner_id: Option<Uuid>,
        folder_id: Option<Uuid>,
        sort: DocumentSort,
        range: &ListRange,
    ) -> AppResult<Vec<Document>> {
        self.documents.list(owner_id, folder_id, sort, range).await
    }

    async fn rename_document(&self, document_id: Uuid, title: &str) -> AppResult<Document> {
        self.documents.rename(document_id, title).await
    }

    async fn delete_document(&self, document_id: Uuid) -> AppResult<bool> {
        self.documents.delete(document_id).await
    }

    async fn head_version(&self, document_id: Uuid) -> AppResult<Option<Version>> {
        self.versions.head(document_id).await
    }

    async fn append_version(&self, new: &NewVersion) -> AppResult<Version> {
        self.versions.append(new).await
    }

    async fn find_version(&self, version_id: Uuid) -> AppResult<Option<Version>> {
        self.versions.find_by_id(version_id).await
    }

    async fn find_version_by_number(
        &self,
        document_id: Uuid,
        version_number: i32,
    ) -> AppResult<Option<Version>> {
        self.versions.find_by_number(document_id, version_number).await
    }

    async fn list_versions(
        &self,
        document_id: Uuid,
        save_type: Option<SaveType>,
        range: &ListRange,
    ) -> AppResult<Vec<Version>> {
        self.versions.list(document_id, save_type, range).await
    }

    async fn insert_tag(
        &self,
        version_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<VersionTag> {
        self.versions.insert_tag(version_id, name, description).await
    }

    async fn list_tags(&self, version_id: Uuid) -> AppResult<Vec<VersionTag>> {
        self.versions.list_tags(version_id).await
    }

    async fn delete_tag(&self, tag_id: Uuid) -> AppResult<bool> {
        self.versions.delete_tag(tag_id).await
    }
}

/// In-memory store used by the service test suites.
#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use chrono::Utc;

    use draftroom_core::AppError;

    use super::*;

    /// HashMap-backed `VersionStore` enforcing the same uniqueness rules as
    /// the SQL schema.
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        documents: Mutex<HashMap<Uuid, Document>>,
        versions: Mutex<Vec<Version>>,
        tags: Mutex<Vec<VersionTag>>,
        /// Test hook: number of upcoming appends to reject with `Conflict`.
        forced_conflicts: AtomicU32,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the next `n` appends fail with `Conflict`, simulating
        /// writers racing on the unique constraint.
        pub fn fail_appends(&self, n: u32) {
            self.forced_conflicts.store(n, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl VersionStore for MemoryStore {
        async fn create_document(
            &self,
            data: &CreateDocument,
            initial: &NewVersion,
        ) -> AppResult<(Document, Version)> {
            let now = Utc::now();
            let document = Document {
                id: Uuid::new_v4(),
                title: data.title.clone(),
                owner_id: data.owner_id,
                folder_id: data.folder_id,
                current_version_number: 1,
                created_at: now,
                updated_at: now,
            };
            let version = Version {
                id: Uuid::new_v4(),
                document_id: document.id,
                version_number: 1,
                content: initial.content.clone(),
                content_hash: initial.content_hash.clone(),
                author: initial.author.clone(),
                author_id: initial.author_id,
                commit_message: initial.commit_message.clone(),
                save_type: initial.save_type,
                parent_version_id: None,
                created_at: now,
            };
            self.documents
                .lock()
                .unwrap()
                .insert(document.id, document.clone());
            self.versions.lock().unwrap().push(version.clone());
            Ok((document, version))
        }

        async fn find_document(&self, document_id: Uuid) -> AppResult<Option<Document>> {
            Ok(self.documents.lock().unwrap().get(&document_id).cloned())
        }

        async fn list_documents(
            &self,
            owner_id: Option<Uuid>,
            folder_id: Option<Uuid>,
            sort: DocumentSort,
            range: &ListRange,
        ) -> AppResult<Vec<Document>> {
            let mut docs: Vec<Document> = self
                .documents
                .lock()
                .unwrap()
                .values()
                .filter(|d| owner_id.is_none() || d.owner_id == owner_id)
                .filter(|d| folder_id.is_none() || d.folder_id == folder_id)
                .cloned()
                .collect();
            match sort {
                DocumentSort::UpdatedAt => docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
                DocumentSort::CreatedAt => docs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
                DocumentSort::Title => docs.sort_by(|a, b| a.title.cmp(&b.title)),
            }
            Ok(docs
                .into_iter()
                .skip(range.offset() as usize)
                .take(range.limit() as usize)
                .collect())
        }

        async fn rename_document(&self, document_id: Uuid, title: &str) -> AppResult<Document> {
            let mut docs = self.documents.lock().unwrap();
            let doc = docs
                .get_mut(&document_id)
                .ok_or_else(|| AppError::not_found(format!("Document {document_id} not found")))?;
            doc.title = title.to_string();
            doc.updated_at = Utc::now();
            Ok(doc.clone())
        }

        async fn delete_document(&self, document_id: Uuid) -> AppResult<bool> {
            let removed = self.documents.lock().unwrap().remove(&document_id).is_some();
            if removed {
                let mut versions = self.versions.lock().unwrap();
                let doomed: Vec<Uuid> = versions
                    .iter()
                    .filter(|v| v.document_id == document_id)
                    .map(|v| v.id)
                    .collect();
                versions.retain(|v| v.document_id != document_id);
                self.tags
                    .lock()
                    .unwrap()
                    .retain(|t| !doomed.contains(&t.version_id));
            }
            Ok(removed)
        }

        async fn head_version(&self, document_id: Uuid) -> AppResult<Option<Version>> {
            Ok(self
                .versions
                .lock()
                .unwrap()
                .iter()
                .filter(|v| v.document_id == document_id)
                .max_by_key(|v| v.version_number)
                .cloned())
        }

        async fn append_version(&self, new: &NewVersion) -> AppResult<Version> {
            if self
                .forced_conflicts
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(AppError::conflict("Simulated version number collision"));
            }
            let mut versions = self.versions.lock().unwrap();
            if versions
                .iter()
                .any(|v| v.document_id == new.document_id && v.version_number == new.version_number)
            {
                return Err(AppError::conflict(format!(
                    "Version {} already exists for document {}",
                    new.version_number, new.document_id
                )));
            }
            let version = Version {
                id: Uuid::new_v4(),
                document_id: new.document_id,
                version_number: new.version_number,
                content: new.content.clone(),
                content_hash: new.content_hash.clone(),
                author: new.author.clone(),
                author_id: new.author_id,
                commit_message: new.commit_message.clone(),
                save_type: new.save_type,
                parent_version_id: new.parent_version_id,
                created_at: Utc::now(),
            };
            versions.push(version.clone());
            if let Some(doc) = self.documents.lock().unwrap().get_mut(&new.document_id) {
                doc.current_version_number = new.version_number;
                doc.updated_at = version.created_at;
            }
            Ok(version)
        }

        async fn find_version(&self, version_id: Uuid) -> AppResult<Option<Version>> {
            Ok(self
                .versions
                .lock()
                .unwrap()
                .iter()
                .find(|v| v.id == version_id)
                .cloned())
        }

        async fn find_version_by_number(
            &self,
            document_id: Uuid,
            version_number: i32,
        ) -> AppResult<Option<Version>> {
            Ok(self
                .versions
                .lock()
                .unwrap()
                .iter()
                .find(|v| v.document_id == document_id && v.version_number == version_number)
                .cloned())
        }

        async fn list_versions(
            &self,
            document_id: Uuid,
            save_type: Option<SaveType>,
            range: &ListRange,
        ) -> AppResult<Vec<Version>> {
            let mut matching: Vec<Version> = self
                .versions
                .lock()
                .unwrap()
                .iter()
                .filter(|v| v.document_id == document_id)
                .filter(|v| save_type.is_none() || Some(v.save_type) == save_type)
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.version_number.cmp(&a.version_number));
            Ok(matching
                .into_iter()
                .skip(range.offset() as usize)
                .take(range.limit() as usize)
                .collect())
        }

        async fn insert_tag(
            &self,
            version_id: Uuid,
            name: &str,
            description: Option<&str>,
        ) -> AppResult<VersionTag> {
            let tag = VersionTag {
                id: Uuid::new_v4(),
                version_id,
                name: name.to_string(),
                description: description.map(String::from),
                created_at: Utc::now(),
            };
            self.tags.lock().unwrap().push(tag.clone());
            Ok(tag)
        }

        async fn list_tags(&self, version_id: Uuid) -> AppResult<Vec<VersionTag>> {
            Ok(self
                .tags
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.version_id == version_id)
                .cloned()
                .collect())
        }

        async fn delete_tag(&self, tag_id: Uuid) -> AppResult<bool> {
            let mut tags = self.tags.lock().unwrap();
            let before = tags.len();
            tags.retain(|t| t.id != tag_id);
            Ok(tags.len() < before)
        }
    }
}
