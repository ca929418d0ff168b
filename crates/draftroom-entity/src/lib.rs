//! # draftroom-entity
//!
//! Domain entities for Draftroom: documents, their immutable version
//! history, and version tags.

pub mod document;

pub use document::model::{CreateDocument, Document, DocumentSort};
pub use document::save_type::SaveType;
pub use document::tag::VersionTag;
pub use document::version::{NewVersion, Version};
