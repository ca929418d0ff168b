//! Typed change segments and aggregate counts produced by the engine.

use serde::{Deserialize, Serialize};

/// Classification of a contiguous run of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present only on the new side.
    Added,
    /// Present only on the old side.
    Deleted,
    /// Both sides present but different.
    Modified,
    /// Identical on both sides.
    Unchanged,
}

/// One change segment.
///
/// `unchanged` segments carry the shared text on both sides so a consumer
/// can reconstruct either full input by concatenating its side in order.
/// Line ranges are 1-based with inclusive ends and are only populated for
/// line and semantic modes; the old and new ranges are computed
/// independently from their own sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// What happened to this run.
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// Old-side text (absent for additions).
    pub old_text: Option<String>,
    /// New-side text (absent for deletions).
    pub new_text: Option<String>,
    /// First affected line on the old side (1-based).
    pub old_line_start: Option<usize>,
    /// Last affected line on the old side (inclusive).
    pub old_line_end: Option<usize>,
    /// First affected line on the new side (1-based).
    pub new_line_start: Option<usize>,
    /// Last affected line on the new side (inclusive).
    pub new_line_end: Option<usize>,
}

impl Change {
    /// An identical run, text shared by both sides.
    pub fn unchanged(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: ChangeKind::Unchanged,
            old_text: Some(text.clone()),
            new_text: Some(text),
            old_line_start: None,
            old_line_end: None,
            new_line_start: None,
            new_line_end: None,
        }
    }

    /// A run replaced by different content.
    pub fn modified(old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Modified,
            old_text: Some(old_text.into()),
            new_text: Some(new_text.into()),
            old_line_start: None,
            old_line_end: None,
            new_line_start: None,
            new_line_end: None,
        }
    }

    /// A run present only on the old side.
    pub fn deleted(old_text: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Deleted,
            old_text: Some(old_text.into()),
            new_text: None,
            old_line_start: None,
            old_line_end: None,
            new_line_start: None,
            new_line_end: None,
        }
    }

    /// A run present only on the new side.
    pub fn added(new_text: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Added,
            old_text: None,
            new_text: Some(new_text.into()),
            old_line_start: None,
            old_line_end: None,
            new_line_start: None,
            new_line_end: None,
        }
    }

    /// Attach the old-side line range (1-based start, inclusive end).
    pub fn with_old_lines(mut self, start: usize, end: usize) -> Self {
        self.old_line_start = Some(start);
        self.old_line_end = Some(end);
        self
    }

    /// Attach the new-side line range (1-based start, inclusive end).
    pub fn with_new_lines(mut self, start: usize, end: usize) -> Self {
        self.new_line_start = Some(start);
        self.new_line_end = Some(end);
        self
    }
}

/// Aggregate counts over a diff.
///
/// `unchanged`, `deleted`, and `added` count token-run lengths. `modified`
/// counts `max(old_run, new_run)` in character/word/line modes but one per
/// block in semantic mode; that asymmetry is long-standing observed
/// behavior and is kept for output compatibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Tokens present only on the new side.
    pub added: usize,
    /// Tokens present only on the old side.
    pub deleted: usize,
    /// Replaced tokens (or blocks, in semantic mode).
    pub modified: usize,
    /// Tokens identical on both sides.
    pub unchanged: usize,
}

/// The full result of one diff computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Ordered change segments.
    pub changes: Vec<Change>,
    /// Aggregate counts.
    pub stats: DiffStats,
}

impl DiffReport {
    /// A report with no changes at all.
    pub fn empty() -> Self {
        Self {
            changes: Vec::new(),
            stats: DiffStats::default(),
        }
    }
}
