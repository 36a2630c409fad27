//! Line alignment: LCS table, forward backtrack, and modification coalescing.
//!
//! ## Table Layout
//!
//! `dp[i][j]` holds the length of the longest common subsequence of
//! `left[i..]` and `right[j..]`. The table is filled from the bottom-right
//! corner, which lets the backtrack walk forward from `(0, 0)` and emit
//! operations in document order without a final reverse.
//!
//! ## Tie-break
//!
//! On a mismatch the walk removes from the left whenever that keeps at least
//! as long a common subsequence as adding from the right
//! (`dp[i + 1][j] >= dp[i][j + 1]`). Among equally short scripts, deletions
//! are therefore listed before insertions.

use crate::model::{EditOperation, SourceLine};

/// Suffix LCS lengths for two line sequences, stored row-major.
struct LcsTable {
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    fn build(left: &[SourceLine], right: &[SourceLine]) -> Self {
        let (m, n) = (left.len(), right.len());
        let cols = n + 1;
        let mut cells = vec![0u32; (m + 1) * cols];

        for i in (0..m).rev() {
            for j in (0..n).rev() {
                cells[i * cols + j] = if left[i].normalized == right[j].normalized {
                    cells[(i + 1) * cols + j + 1] + 1
                } else {
                    cells[(i + 1) * cols + j].max(cells[i * cols + j + 1])
                };
            }
        }

        Self { cols, cells }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.cols + j]
    }
}

/// Computes an edit script of `Context`, `Added` and `Removed` operations.
///
/// Two lines are equal when their `normalized` text is equal. Runs in
/// O(m·n) time and memory.
#[must_use]
pub fn align(left: &[SourceLine], right: &[SourceLine]) -> Vec<EditOperation> {
    let (m, n) = (left.len(), right.len());
    tracing::debug!(left = m, right = n, cells = (m + 1) * (n + 1), "aligning lines");

    let table = LcsTable::build(left, right);
    let mut ops = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (0, 0);

    while i < m && j < n {
        if left[i].normalized == right[j].normalized {
            ops.push(EditOperation::Context {
                left: left[i].clone(),
                right: right[j].clone(),
            });
            i += 1;
            j += 1;
        } else if table.get(i + 1, j) >= table.get(i, j + 1) {
            ops.push(EditOperation::Removed {
                left: left[i].clone(),
            });
            i += 1;
        } else {
            ops.push(EditOperation::Added {
                right: right[j].clone(),
            });
            j += 1;
        }
    }

    ops.extend(
        left[i..]
            .iter()
            .map(|line| EditOperation::Removed { left: line.clone() }),
    );
    ops.extend(
        right[j..]
            .iter()
            .map(|line| EditOperation::Added {
                right: line.clone(),
            }),
    );

    ops
}

/// Merges each `Removed` that is immediately followed by an `Added` into a
/// single `Modified` entry.
///
/// The merge is greedy with one entry of lookahead: in
/// `removed, removed, added, added` only the adjacent middle pair merges. The
/// resulting `Modified` entries carry no word diff yet.
#[must_use]
pub fn coalesce(ops: Vec<EditOperation>) -> Vec<EditOperation> {
    let mut out = Vec::with_capacity(ops.len());
    let mut iter = ops.into_iter().peekable();

    while let Some(op) = iter.next() {
        let EditOperation::Removed { left } = op else {
            out.push(op);
            continue;
        };

        match iter.next_if(|next| matches!(next, EditOperation::Added { .. })) {
            Some(EditOperation::Added { right }) => out.push(EditOperation::Modified {
                left,
                right,
                word_diff: None,
            }),
            _ => out.push(EditOperation::Removed { left }),
        }
    }

    out
}
