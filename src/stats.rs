//! Summary counts over an edit script.

use crate::model::{DiffStats, EditOperation};

/// Tallies each operation kind.
///
/// `left_len` and `right_len` are the lengths of the normalized sequences
/// that were aligned (after blank-line collapsing), not raw line counts.
#[must_use]
pub fn compute_stats(ops: &[EditOperation], left_len: usize, right_len: usize) -> DiffStats {
    let (mut added, mut removed, mut modified, mut unchanged) = (0, 0, 0, 0);

    for op in ops {
        match op {
            EditOperation::Context { .. } => unchanged += 1,
            EditOperation::Added { .. } => added += 1,
            EditOperation::Removed { .. } => removed += 1,
            EditOperation::Modified { .. } => modified += 1,
        }
    }

    let denominator = left_len.max(right_len).max(1);

    DiffStats {
        added,
        removed,
        modified,
        unchanged,
        similarity: unchanged as f64 / denominator as f64,
    }
}
