//! Ratcliff–Obershelp sequence matching over arbitrary token slices.
//!
//! Produces the same matching blocks and opcodes as Python's
//! `difflib.SequenceMatcher` with the junk heuristics disabled: repeatedly
//! find the longest contiguous matching block, then recurse into the
//! unmatched regions on either side.

use std::collections::HashMap;
use std::hash::Hash;

/// How a pair of token ranges relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    /// Ranges are identical.
    Equal,
    /// Ranges differ on both sides.
    Replace,
    /// Range present only on the old side.
    Delete,
    /// Range present only on the new side.
    Insert,
}

/// One aligned region: `old[old_start..old_end]` vs `new[new_start..new_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    /// Relationship between the two ranges.
    pub tag: OpTag,
    /// Start of the old-side range.
    pub old_start: usize,
    /// End (exclusive) of the old-side range.
    pub old_end: usize,
    /// Start of the new-side range.
    pub new_start: usize,
    /// End (exclusive) of the new-side range.
    pub new_end: usize,
}

/// Find the longest matching block within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties resolve to the earliest block in `a`, then the earliest in `b`,
/// matching the reference behavior.
fn find_longest_match<T: Eq + Hash>(
    a: &[T],
    b2j: &HashMap<&T, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0usize;

    // j2len[j] = length of the longest match ending at a[i - 1], b[j].
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                new_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}

/// All maximal matching blocks `(old_index, new_index, length)` in order,
/// terminated by the sentinel `(a.len(), b.len(), 0)`.
pub fn matching_blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<(usize, usize, usize)> {
    let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
    for (j, token) in b.iter().enumerate() {
        b2j.entry(token).or_default().push(j);
    }

    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];
    let mut matches = Vec::new();
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = find_longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k > 0 {
            matches.push((i, j, k));
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
    }
    matches.sort_unstable();

    // Coalesce adjacent blocks so consumers see maximal runs.
    let mut blocks: Vec<(usize, usize, usize)> = Vec::with_capacity(matches.len() + 1);
    for (i, j, k) in matches {
        if let Some(last) = blocks.last_mut() {
            if last.0 + last.2 == i && last.1 + last.2 == j {
                last.2 += k;
                continue;
            }
        }
        blocks.push((i, j, k));
    }
    blocks.push((a.len(), b.len(), 0));
    blocks
}

/// Classify the gaps between matching blocks into opcodes.
pub fn opcodes<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let mut ops = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    for (ai, bj, size) in matching_blocks(a, b) {
        let tag = if i < ai && j < bj {
            Some(OpTag::Replace)
        } else if i < ai {
            Some(OpTag::Delete)
        } else if j < bj {
            Some(OpTag::Insert)
        } else {
            None
        };
        if let Some(tag) = tag {
            ops.push(Opcode {
                tag,
                old_start: i,
                old_end: ai,
                new_start: j,
                new_end: bj,
            });
        }
        i = ai + size;
        j = bj + size;
        if size > 0 {
            ops.push(Opcode {
                tag: OpTag::Equal,
                old_start: ai,
                old_end: i,
                new_start: bj,
                new_end: j,
            });
        }
    }
    ops
}

/// Similarity ratio `2·matches / (len(a) + len(b))` in `[0, 1]`.
///
/// Two empty sequences are considered identical (ratio 1).
pub fn similarity<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(a, b).iter().map(|&(_, _, k)| k).sum();
    2.0 * matched as f64 / total as f64
}
