//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use draftroom_entity::SaveType;

/// Create document request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    /// Document title.
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    /// Content of version 1 (defaults to empty).
    #[serde(default)]
    pub initial_content: String,
    /// Author display name.
    pub author: Option<String>,
    /// Author user reference.
    pub author_id: Option<Uuid>,
    /// Folder to place the document in.
    pub folder_id: Option<Uuid>,
}

/// Update document request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    /// New title.
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
}

/// Create version request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVersionRequest {
    /// Full text content to save.
    pub content: String,
    /// Optional commit message.
    pub commit_message: Option<String>,
    /// How the save was triggered.
    #[serde(default = "default_save_type")]
    pub save_type: SaveType,
    /// Author display name.
    pub author: Option<String>,
    /// Author user reference.
    pub author_id: Option<Uuid>,
}

/// Create version tag request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// Short label.
    #[validate(length(min = 1, max = 50, message = "Tag name must be 1-50 characters"))]
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

fn default_save_type() -> SaveType {
    SaveType::Manual
}

/// Display name used when a request carries none.
pub fn author_or_anonymous(author: Option<String>) -> String {
    author
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_title_validation() {
        let request = CreateDocumentRequest {
            title: String::new(),
            initial_content: String::new(),
            author: None,
            author_id: None,
            folder_id: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_save_type_defaults_to_manual() {
        let request: CreateVersionRequest =
            serde_json::from_str(r#"{"content": "x"}"#).unwrap();
        assert_eq!(request.save_type, SaveType::Manual);
    }

    #[test]
    fn test_author_fallback() {
        assert_eq!(author_or_anonymous(None), "anonymous");
        assert_eq!(author_or_anonymous(Some("  ".into())), "anonymous");
        assert_eq!(author_or_anonymous(Some("alice".into())), "alice");
    }
}
