//! # draftroom-service
//!
//! Business logic for Draftroom. The version service owns the append-only
//! history invariants (dedup, dense numbering, restore-by-copy); the diff
//! service resolves version pairs and runs the diff engine over them.

pub mod document;

pub use document::diff::{DiffService, VersionDiff};
pub use document::service::{SaveOutcome, SaveVersion, VersionService};
pub use document::store::{SqlVersionStore, VersionStore};
