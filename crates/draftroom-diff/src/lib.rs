//! # draftroom-diff
//!
//! Pure text diff engine. Computes structural differences between two text
//! blobs at four granularities (character, word, line, semantic) with a
//! similarity-based merge heuristic for semantic mode.
//!
//! The engine is a pure function over its inputs: no I/O, no shared state,
//! and no failure modes — any pair of strings, including empty ones,
//! produces a well-formed report.

pub mod change;
pub mod engine;
pub mod matcher;
pub mod mode;

pub use change::{Change, ChangeKind, DiffReport, DiffStats};
pub use engine::{DiffOptions, compute};
pub use mode::DiffMode;
