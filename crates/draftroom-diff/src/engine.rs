//! Diff computation: preprocessing, mode dispatch, and change assembly.

use crate::change::{Change, DiffReport, DiffStats};
use crate::matcher::{self, OpTag};
use crate::mode::DiffMode;

/// A replaced block whose character similarity exceeds this ratio is
/// reported as a single `modified` change in semantic mode; anything at or
/// below it splits into a deletion plus an addition.
const SEMANTIC_MODIFY_THRESHOLD: f64 = 0.3;

/// Options controlling one diff computation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiffOptions {
    /// Token granularity.
    pub mode: DiffMode,
    /// Collapse whitespace runs to single spaces before diffing.
    pub ignore_whitespace: bool,
    /// Lowercase both inputs before diffing.
    pub ignore_case: bool,
}

/// Compute the diff between `old` and `new`.
///
/// Normalization flags apply to both the comparison and the reported text:
/// whitespace collapsing runs first, then case folding.
pub fn compute(old: &str, new: &str, options: &DiffOptions) -> DiffReport {
    let old = normalize(old, options);
    let new = normalize(new, options);

    match options.mode {
        DiffMode::Character => character_diff(&old, &new),
        DiffMode::Word => word_diff(&old, &new),
        DiffMode::Line => line_diff(&old, &new),
        DiffMode::Semantic => semantic_diff(&old, &new),
    }
}

fn normalize(text: &str, options: &DiffOptions) -> String {
    let mut text = if options.ignore_whitespace {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        text.to_string()
    };
    if options.ignore_case {
        text = text.to_lowercase();
    }
    text
}

/// Split into lines keeping each line's terminator, so concatenating the
/// tokens reproduces the input exactly.
fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

fn character_diff(old: &str, new: &str) -> DiffReport {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();

    let mut changes = Vec::new();
    let mut stats = DiffStats::default();
    for op in matcher::opcodes(&a, &b) {
        let old_run = op.old_end - op.old_start;
        let new_run = op.new_end - op.new_start;
        let old_text: String = a[op.old_start..op.old_end].iter().collect();
        let new_text: String = b[op.new_start..op.new_end].iter().collect();
        match op.tag {
            OpTag::Equal => {
                stats.unchanged += old_run;
                changes.push(Change::unchanged(old_text));
            }
            OpTag::Replace => {
                stats.modified += old_run.max(new_run);
                changes.push(Change::modified(old_text, new_text));
            }
            OpTag::Delete => {
                stats.deleted += old_run;
                changes.push(Change::deleted(old_text));
            }
            OpTag::Insert => {
                stats.added += new_run;
                changes.push(Change::added(new_text));
            }
        }
    }

    DiffReport { changes, stats }
}

fn word_diff(old: &str, new: &str) -> DiffReport {
    let a: Vec<&str> = old.split_whitespace().collect();
    let b: Vec<&str> = new.split_whitespace().collect();

    let mut changes = Vec::new();
    let mut stats = DiffStats::default();
    for op in matcher::opcodes(&a, &b) {
        let old_run = op.old_end - op.old_start;
        let new_run = op.new_end - op.new_start;
        let old_text = a[op.old_start..op.old_end].join(" ");
        let new_text = b[op.new_start..op.new_end].join(" ");
        match op.tag {
            OpTag::Equal => {
                stats.unchanged += old_run;
                changes.push(Change::unchanged(old_text));
            }
            OpTag::Replace => {
                stats.modified += old_run.max(new_run);
                changes.push(Change::modified(old_text, new_text));
            }
            OpTag::Delete => {
                stats.deleted += old_run;
                changes.push(Change::deleted(old_text));
            }
            OpTag::Insert => {
                stats.added += new_run;
                changes.push(Change::added(new_text));
            }
        }
    }

    DiffReport { changes, stats }
}

fn line_diff(old: &str, new: &str) -> DiffReport {
    let a = split_lines(old);
    let b = split_lines(new);

    let mut changes = Vec::new();
    let mut stats = DiffStats::default();
    for op in matcher::opcodes(&a, &b) {
        let old_run = op.old_end - op.old_start;
        let new_run = op.new_end - op.new_start;
        let old_text = a[op.old_start..op.old_end].concat();
        let new_text = b[op.new_start..op.new_end].concat();
        match op.tag {
            OpTag::Equal => {
                stats.unchanged += old_run;
                changes.push(
                    Change::unchanged(old_text)
                        .with_old_lines(op.old_start + 1, op.old_end)
                        .with_new_lines(op.new_start + 1, op.new_end),
                );
            }
            OpTag::Replace => {
                stats.modified += old_run.max(new_run);
                changes.push(
                    Change::modified(old_text, new_text)
                        .with_old_lines(op.old_start + 1, op.old_end)
                        .with_new_lines(op.new_start + 1, op.new_end),
                );
            }
            OpTag::Delete => {
                stats.deleted += old_run;
                changes.push(
                    Change::deleted(old_text).with_old_lines(op.old_start + 1, op.old_end),
                );
            }
            OpTag::Insert => {
                stats.added += new_run;
                changes
                    .push(Change::added(new_text).with_new_lines(op.new_start + 1, op.new_end));
            }
        }
    }

    DiffReport { changes, stats }
}

/// Line-level alignment with a character-similarity rescue for replaced
/// blocks: chunks that still resemble each other are reported as one edit,
/// while wholesale rewrites split into a deletion and an addition.
fn semantic_diff(old: &str, new: &str) -> DiffReport {
    let a = split_lines(old);
    let b = split_lines(new);

    let mut changes = Vec::new();
    let mut stats = DiffStats::default();
    for op in matcher::opcodes(&a, &b) {
        let old_run = op.old_end - op.old_start;
        let new_run = op.new_end - op.new_start;
        let old_chunk = a[op.old_start..op.old_end].concat();
        let new_chunk = b[op.new_start..op.new_end].concat();
        match op.tag {
            OpTag::Equal => {
                stats.unchanged += old_run;
                changes.push(
                    Change::unchanged(old_chunk)
                        .with_old_lines(op.old_start + 1, op.old_end)
                        .with_new_lines(op.new_start + 1, op.new_end),
                );
            }
            OpTag::Replace => {
                let old_chars: Vec<char> = old_chunk.chars().collect();
                let new_chars: Vec<char> = new_chunk.chars().collect();
                let ratio = matcher::similarity(&old_chars, &new_chars);
                if ratio > SEMANTIC_MODIFY_THRESHOLD {
                    // Counted per block, not per line.
                    stats.modified += 1;
                    changes.push(
                        Change::modified(old_chunk, new_chunk)
                            .with_old_lines(op.old_start + 1, op.old_end)
                            .with_new_lines(op.new_start + 1, op.new_end),
                    );
                } else {
                    stats.deleted += old_run;
                    stats.added += new_run;
                    changes.push(
                        Change::deleted(old_chunk)
                            .with_old_lines(op.old_start + 1, op.old_end),
                    );
                    changes.push(
                        Change::added(new_chunk)
                            .with_new_lines(op.new_start + 1, op.new_end),
                    );
                }
            }
            OpTag::Delete => {
                stats.deleted += old_run;
                changes.push(
                    Change::deleted(old_chunk).with_old_lines(op.old_start + 1, op.old_end),
                );
            }
            OpTag::Insert => {
                stats.added += new_run;
                changes
                    .push(Change::added(new_chunk).with_new_lines(op.new_start + 1, op.new_end));
            }
        }
    }

    DiffReport { changes, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeKind;

    fn options(mode: DiffMode) -> DiffOptions {
        DiffOptions {
            mode,
            ..DiffOptions::default()
        }
    }

    /// Rebuild one side of the input from the report. Word mode discards
    /// inter-word whitespace, so its segments rejoin with single spaces.
    fn reconstruct(report: &DiffReport, mode: DiffMode, old_side: bool) -> String {
        let parts: Vec<&str> = report
            .changes
            .iter()
            .filter_map(|c| {
                if old_side {
                    c.old_text.as_deref()
                } else {
                    c.new_text.as_deref()
                }
            })
            .filter(|t| !t.is_empty())
            .collect();
        if mode == DiffMode::Word {
            parts.join(" ")
        } else {
            parts.concat()
        }
    }

    #[test]
    fn test_line_mode_concrete_scenario() {
        let old = "line1\nline2\nline3\n";
        let new = "line1\nlineTWO\nline3\n";
        let report = compute(old, new, &options(DiffMode::Line));

        assert_eq!(report.changes.len(), 3);

        assert_eq!(report.changes[0].kind, ChangeKind::Unchanged);
        assert_eq!(report.changes[0].old_text.as_deref(), Some("line1\n"));
        assert_eq!(report.changes[0].old_line_start, Some(1));
        assert_eq!(report.changes[0].old_line_end, Some(1));

        assert_eq!(report.changes[1].kind, ChangeKind::Modified);
        assert_eq!(report.changes[1].old_text.as_deref(), Some("line2\n"));
        assert_eq!(report.changes[1].new_text.as_deref(), Some("lineTWO\n"));
        assert_eq!(report.changes[1].old_line_start, Some(2));
        assert_eq!(report.changes[1].new_line_start, Some(2));

        assert_eq!(report.changes[2].kind, ChangeKind::Unchanged);
        assert_eq!(report.changes[2].old_text.as_deref(), Some("line3\n"));

        assert_eq!(
            report.stats,
            DiffStats {
                added: 0,
                deleted: 0,
                modified: 1,
                unchanged: 2
            }
        );
    }

    #[test]
    fn test_reconstruction_all_modes_and_flags() {
        let old = "The quick brown fox\njumps OVER\nthe lazy dog\n";
        let new = "The slow brown fox\nleaps over\nthe lazy dog\nand naps\n";

        for mode in [
            DiffMode::Character,
            DiffMode::Word,
            DiffMode::Line,
            DiffMode::Semantic,
        ] {
            for ignore_whitespace in [false, true] {
                for ignore_case in [false, true] {
                    let opts = DiffOptions {
                        mode,
                        ignore_whitespace,
                        ignore_case,
                    };
                    let report = compute(old, new, &opts);

                    // Reported text reflects normalized content.
                    let expect_old = normalize(old, &opts);
                    let expect_new = normalize(new, &opts);
                    let (expect_old, expect_new) = if mode == DiffMode::Word {
                        (
                            expect_old.split_whitespace().collect::<Vec<_>>().join(" "),
                            expect_new.split_whitespace().collect::<Vec<_>>().join(" "),
                        )
                    } else {
                        (expect_old, expect_new)
                    };

                    assert_eq!(
                        reconstruct(&report, mode, true),
                        expect_old,
                        "old reconstruction failed for {mode} ws={ignore_whitespace} case={ignore_case}"
                    );
                    assert_eq!(
                        reconstruct(&report, mode, false),
                        expect_new,
                        "new reconstruction failed for {mode} ws={ignore_whitespace} case={ignore_case}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_inputs() {
        let report = compute("", "hello\nworld\n", &options(DiffMode::Line));
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].kind, ChangeKind::Added);
        assert_eq!(report.stats.added, 2);
        assert_eq!(report.stats.deleted + report.stats.modified + report.stats.unchanged, 0);

        let report = compute("hello", "", &options(DiffMode::Character));
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].kind, ChangeKind::Deleted);
        assert_eq!(report.stats.deleted, 5);

        let report = compute("", "", &options(DiffMode::Semantic));
        assert!(report.changes.is_empty());
        assert_eq!(report.stats, DiffStats::default());
    }

    #[test]
    fn test_identical_inputs_single_unchanged() {
        let text = "alpha\nbeta\n";
        for mode in [
            DiffMode::Character,
            DiffMode::Word,
            DiffMode::Line,
            DiffMode::Semantic,
        ] {
            let report = compute(text, text, &options(mode));
            assert_eq!(report.changes.len(), 1, "mode {mode}");
            assert_eq!(report.changes[0].kind, ChangeKind::Unchanged);
            assert_eq!(report.stats.added, 0);
            assert_eq!(report.stats.deleted, 0);
            assert_eq!(report.stats.modified, 0);
        }
    }

    #[test]
    fn test_semantic_threshold_boundary() {
        // 3 matching characters out of 20 → ratio exactly 0.3 → split.
        let report = compute("abc0000000", "abc1111111", &options(DiffMode::Semantic));
        let kinds: Vec<ChangeKind> = report.changes.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Deleted, ChangeKind::Added]);
        assert_eq!(
            report.stats,
            DiffStats {
                added: 1,
                deleted: 1,
                modified: 0,
                unchanged: 0
            }
        );

        // 4 matching characters out of 20 → ratio 0.4 → merged edit.
        let report = compute("abcd000000", "abcd111111", &options(DiffMode::Semantic));
        let kinds: Vec<ChangeKind> = report.changes.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Modified]);
        assert_eq!(report.stats.modified, 1);
    }

    #[test]
    fn test_semantic_counts_blocks_line_counts_lines() {
        // A two-line block rewritten with high similarity.
        let old = "first line here\nsecond line here\n";
        let new = "first line HERE\nsecond line HERE\n";

        let semantic = compute(old, new, &options(DiffMode::Semantic));
        assert_eq!(semantic.stats.modified, 1);

        let line = compute(old, new, &options(DiffMode::Line));
        assert_eq!(line.stats.modified, 2);
    }

    #[test]
    fn test_word_mode_basic() {
        let report = compute(
            "the quick brown fox",
            "the slow brown fox",
            &options(DiffMode::Word),
        );
        let kinds: Vec<ChangeKind> = report.changes.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChangeKind::Unchanged,
                ChangeKind::Modified,
                ChangeKind::Unchanged
            ]
        );
        assert_eq!(report.changes[1].old_text.as_deref(), Some("quick"));
        assert_eq!(report.changes[1].new_text.as_deref(), Some("slow"));
        assert_eq!(report.changes[2].old_text.as_deref(), Some("brown fox"));
        assert_eq!(report.stats.unchanged, 3);
        assert_eq!(report.stats.modified, 1);
        // No line tracking outside line-based modes.
        assert_eq!(report.changes[1].old_line_start, None);
    }

    #[test]
    fn test_character_mode_insert() {
        let report = compute("abc", "abXc", &options(DiffMode::Character));
        let kinds: Vec<ChangeKind> = report.changes.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChangeKind::Unchanged,
                ChangeKind::Added,
                ChangeKind::Unchanged
            ]
        );
        assert_eq!(report.stats.added, 1);
        assert_eq!(report.stats.unchanged, 3);
    }

    #[test]
    fn test_new_side_line_numbers_track_their_own_side() {
        // Deleting line 2 shifts the trailing context: old lines 3..3,
        // new lines 2..2.
        let report = compute("a\nx\nb\n", "a\nb\n", &options(DiffMode::Line));
        let trailing = report
            .changes
            .iter()
            .find(|c| c.kind == ChangeKind::Unchanged && c.old_text.as_deref() == Some("b\n"))
            .expect("trailing context change");
        assert_eq!(trailing.old_line_start, Some(3));
        assert_eq!(trailing.old_line_end, Some(3));
        assert_eq!(trailing.new_line_start, Some(2));
        assert_eq!(trailing.new_line_end, Some(2));
    }

    #[test]
    fn test_whitespace_then_case_normalization() {
        let opts = DiffOptions {
            mode: DiffMode::Word,
            ignore_whitespace: true,
            ignore_case: true,
        };
        let report = compute("Hello   World", "hello world", &opts);
        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].kind, ChangeKind::Unchanged);
        assert_eq!(report.changes[0].old_text.as_deref(), Some("hello world"));
    }

    #[test]
    fn test_missing_trailing_newline_round_trips() {
        let old = "one\ntwo";
        let new = "one\nthree";
        let report = compute(old, new, &options(DiffMode::Line));
        assert_eq!(reconstruct(&report, DiffMode::Line, true), old);
        assert_eq!(reconstruct(&report, DiffMode::Line, false), new);
    }
}
