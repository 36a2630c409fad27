//! Turning an edit script into display-ready side-by-side rows.
//!
//! Every edit operation becomes exactly one [`Row`]. Lines that exist on only
//! one side get a filler on the other, so both columns stay aligned in the
//! viewer.
//!
//! ## Highlight Strategy
//!
//! - Added and removed lines are highlighted across the full line.
//! - Modified lines with a word diff highlight only the changed tokens:
//!   removed tokens on the left, added tokens on the right.
//! - Adjacent token regions separated only by whitespace are merged, and a
//!   set of regions covering all non-whitespace collapses to a full-line
//!   highlight.
//! - Modified lines without a word diff are highlighted in full on both sides.

use crate::model::{DiffStats, EditOperation, SourceLine, TokenKind, WordToken};
use crate::words::token_columns;
use serde::Serialize;
use smallvec::SmallVec;

/// Most lines have 0-2 highlight regions; inline storage avoids heap allocation.
type Highlights = SmallVec<[HighlightRegion; 2]>;

/// A highlight region within a line, specified by byte column range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightRegion {
    /// Start column (0-indexed, inclusive).
    pub start: u32,

    /// End column (exclusive), or -1 to indicate full-line highlight.
    ///
    /// The sentinel lets the Lua side detect a full-line highlight without
    /// knowing the line length.
    pub end: i32,
}

impl HighlightRegion {
    #[inline]
    #[must_use]
    fn full_line() -> Self {
        Self { start: 0, end: -1 }
    }

    #[inline]
    #[must_use]
    fn columns(start: u32, end: u32) -> Self {
        Self {
            start,
            end: i32::try_from(end).unwrap_or(i32::MAX),
        }
    }

    /// Whether this region stands for the whole line.
    #[inline]
    #[must_use]
    pub fn is_full_line(&self) -> bool {
        self.end == -1
    }
}

/// One side (left or right) of a diff row for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Side {
    /// The raw text of the line. Empty for filler lines.
    pub content: String,

    /// 1-based line number in the original input, `None` for fillers.
    pub line_number: Option<usize>,

    /// Whether this is a filler (placeholder) line.
    pub is_filler: bool,

    /// Regions within the line to highlight as changed.
    ///
    /// Empty for unchanged lines and filler lines.
    pub highlights: Highlights,
}

impl Side {
    #[inline]
    fn new(line: &SourceLine, highlights: Highlights) -> Self {
        Self {
            content: line.raw.clone(),
            line_number: Some(line.index),
            is_filler: false,
            highlights,
        }
    }

    #[inline]
    #[must_use]
    fn filler() -> Self {
        Self {
            content: String::new(),
            line_number: None,
            is_filler: true,
            highlights: Highlights::new(),
        }
    }

    #[inline]
    #[must_use]
    fn unchanged(line: &SourceLine) -> Self {
        Self::new(line, Highlights::new())
    }

    #[inline]
    #[must_use]
    fn with_full_highlight(line: &SourceLine) -> Self {
        Self::new(line, smallvec::smallvec![HighlightRegion::full_line()])
    }

    fn is_changed(&self) -> bool {
        self.is_filler || !self.highlights.is_empty()
    }
}

/// A single row in the diff display.
///
/// - Both sides with content and highlights: a modified line
/// - Left with content, right filler: a removed line
/// - Left filler, right with content: an added line
/// - Both sides without highlights: a context line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub left: Side,
    pub right: Side,
}

/// A comparison laid out for side-by-side display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDiff {
    pub rows: Vec<Row>,

    /// Row indices (0-indexed) where hunks start.
    ///
    /// Used for navigation commands like "jump to next hunk".
    pub hunk_starts: Vec<u32>,

    pub stats: DiffStats,
}

/// Lays out an edit script as aligned rows.
#[must_use]
pub fn process(ops: &[EditOperation], stats: DiffStats) -> DisplayDiff {
    let mut rows = Vec::with_capacity(ops.len());
    let mut hunk_starts = Vec::new();
    let mut in_hunk = false;

    for (row_idx, op) in ops.iter().enumerate() {
        let row = row_for(op);

        // Track hunk boundaries for navigation
        let is_changed = row.left.is_changed() || row.right.is_changed();
        if is_changed && !in_hunk {
            hunk_starts.push(row_idx as u32);
            in_hunk = true;
        } else if !is_changed {
            in_hunk = false;
        }

        rows.push(row);
    }

    DisplayDiff {
        rows,
        hunk_starts,
        stats,
    }
}

fn row_for(op: &EditOperation) -> Row {
    match op {
        EditOperation::Context { left, right } => Row {
            left: Side::unchanged(left),
            right: Side::unchanged(right),
        },
        EditOperation::Added { right } => Row {
            left: Side::filler(),
            right: Side::with_full_highlight(right),
        },
        EditOperation::Removed { left } => Row {
            left: Side::with_full_highlight(left),
            right: Side::filler(),
        },
        EditOperation::Modified {
            left,
            right,
            word_diff: None,
        } => Row {
            left: Side::with_full_highlight(left),
            right: Side::with_full_highlight(right),
        },
        EditOperation::Modified {
            left,
            right,
            word_diff: Some(tokens),
        } => Row {
            left: Side::new(left, compute_highlights(&left.raw, tokens, TokenKind::Removed)),
            right: Side::new(right, compute_highlights(&right.raw, tokens, TokenKind::Added)),
        },
    }
}

/// Computes highlight regions for one side of a modified line.
///
/// - No changed tokens on this side → empty (no highlighting)
/// - Adjacent regions separated by whitespace → merged
/// - All non-whitespace covered → full-line highlight
fn compute_highlights(content: &str, tokens: &[WordToken], kind: TokenKind) -> Highlights {
    let regions = token_columns(tokens, kind);
    if regions.is_empty() {
        return Highlights::new();
    }

    let merged = merge_regions(&regions, content);

    if covers_all_non_whitespace(content, &merged) {
        return smallvec::smallvec![HighlightRegion::full_line()];
    }

    merged
        .into_iter()
        .map(|(start, end)| HighlightRegion::columns(start, end))
        .collect()
}

/// Merges adjacent change regions, bridging gaps that contain only whitespace.
///
/// Regions must be sorted by start column, which token order guarantees.
fn merge_regions(regions: &[(u32, u32)], content: &str) -> SmallVec<[(u32, u32); 4]> {
    let mut merged: SmallVec<[(u32, u32); 4]> = SmallVec::with_capacity(regions.len());

    for &(start, end) in regions {
        if let Some((_, last_end)) = merged.last_mut() {
            let gap_start = *last_end as usize;
            let gap_end = start as usize;

            if gap_start >= gap_end || is_whitespace_only(content, gap_start, gap_end) {
                *last_end = (*last_end).max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

#[inline]
fn is_whitespace_only(content: &str, start: usize, end: usize) -> bool {
    content
        .get(start..end)
        .is_some_and(|gap| gap.chars().all(char::is_whitespace))
}

/// Checks if the regions cover all non-whitespace characters in the line.
fn covers_all_non_whitespace(line: &str, regions: &[(u32, u32)]) -> bool {
    let mut has_non_ws = false;

    for (i, c) in line.char_indices() {
        if !c.is_whitespace() {
            has_non_ws = true;
            let pos = i as u32;
            if !regions
                .iter()
                .any(|(start, end)| pos >= *start && pos < *end)
            {
                return false;
            }
        }
    }

    has_non_ws
}
