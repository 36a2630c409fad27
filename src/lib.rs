//! # linediff-nvim
//!
//! A line-based text comparison engine with a Neovim side-by-side viewer.
//!
//! Two texts are compared line by line using a longest-common-subsequence
//! alignment. Adjacent deletions and insertions are paired up as modified
//! lines, and modified lines can optionally be compared word by word to
//! highlight exactly which tokens changed.
//!
//! ## Architecture
//!
//! Data flows one way through the pipeline:
//!
//! - `normalize` - splits raw text into lines and applies case/whitespace policies
//! - `align` - LCS alignment into an edit script, then modification coalescing
//! - `words` - token-level diff for modified line pairs
//! - `stats` - summary counts and similarity
//! - `processor` - lays an edit script out as aligned side-by-side rows
//! - `unified` - exports an edit script as unified-diff text
//! - `request` - size-guarded requests, JSON decoding and parallel batches
//! - `lua` - Lua bindings (cargo feature `nvim`)
//!
//! Every comparison is pure and stateless, so independent comparisons can run
//! on any thread.
//!
//! ## Usage from Lua
//!
//! ```lua
//! local linediff = require("linediff_nvim")
//!
//! local result = linediff.compare(old_text, new_text, {
//!   ignore_case = false,
//!   trim_whitespace = true,
//!   ignore_intra_whitespace = false,
//!   collapse_blank_lines = false,
//!   word_diff = true,
//! })
//!
//! -- result.rows, result.hunk_starts, result.stats, result.operations
//! ```

pub mod align;
pub mod error;
#[cfg(feature = "nvim")]
mod lua;
pub mod model;
pub mod normalize;
pub mod processor;
pub mod request;
pub mod stats;
pub mod unified;
pub mod words;

pub use error::CompareError;
pub use model::{DiffStats, EditOperation, NormalizationOptions, SourceLine, TokenKind, WordToken};
pub use request::{CompareRequest, compare_all};

use serde::Serialize;

/// The edit script and summary of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub operations: Vec<EditOperation>,
    pub stats: DiffStats,
}

impl Comparison {
    /// Lays the edit script out as side-by-side rows.
    #[must_use]
    pub fn display(&self) -> processor::DisplayDiff {
        processor::process(&self.operations, self.stats)
    }

    /// Renders the edit script as unified-diff text.
    #[must_use]
    pub fn to_unified(&self, left_label: &str, right_label: &str) -> String {
        unified::to_unified(&self.operations, left_label, right_label)
    }

    pub fn to_json(&self) -> Result<String, CompareError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Compares two texts.
///
/// Runs normalize → align → coalesce, then (when `word_diff` is set) fills in
/// the token-level diff of every modified line from its raw text, and finally
/// tallies the stats against the normalized sequence lengths.
#[must_use]
pub fn compare(
    left: &str,
    right: &str,
    options: &NormalizationOptions,
    word_diff: bool,
) -> Comparison {
    let left_lines = normalize::normalize(left, options);
    let right_lines = normalize::normalize(right, options);

    let mut operations = align::coalesce(align::align(&left_lines, &right_lines));

    if word_diff {
        for op in &mut operations {
            if let EditOperation::Modified {
                left,
                right,
                word_diff: tokens,
            } = op
            {
                *tokens = Some(words::word_diff(&left.raw, &right.raw));
            }
        }
    }

    let stats = stats::compute_stats(&operations, left_lines.len(), right_lines.len());
    tracing::debug!(
        added = stats.added,
        removed = stats.removed,
        modified = stats.modified,
        unchanged = stats.unchanged,
        "comparison finished"
    );

    Comparison { operations, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(result: &Comparison) -> Vec<&'static str> {
        result.operations.iter().map(EditOperation::kind).collect()
    }

    #[test]
    fn identical_texts() {
        let text = "fn main() {\n    run();\n}";
        let result = compare(text, text, &NormalizationOptions::exact(), true);
        assert_eq!(kinds(&result), vec!["context"; 3]);
        assert_eq!(result.stats.similarity, 1.0);
    }

    #[test]
    fn substituted_middle_line() {
        let result = compare("a\nb\nc", "a\nx\nc", &NormalizationOptions::exact(), false);

        assert_eq!(kinds(&result), vec!["context", "modified", "context"]);
        let EditOperation::Modified {
            left,
            right,
            word_diff,
        } = &result.operations[1]
        else {
            panic!("expected a modified line");
        };
        assert_eq!((left.raw.as_str(), right.raw.as_str()), ("b", "x"));
        assert!(word_diff.is_none());

        assert_eq!(result.stats.added, 0);
        assert_eq!(result.stats.removed, 0);
        assert_eq!(result.stats.modified, 1);
        assert_eq!(result.stats.unchanged, 2);
        assert!((result.stats.similarity - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn word_diff_filled_for_modified_lines() {
        let result = compare(
            "let x = 1;",
            "let x = 2;",
            &NormalizationOptions::exact(),
            true,
        );
        let EditOperation::Modified {
            word_diff: Some(tokens),
            ..
        } = &result.operations[0]
        else {
            panic!("expected a word diff");
        };

        let changed: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Unchanged)
            .map(|t| (t.kind, t.content.as_str()))
            .collect();
        assert_eq!(
            changed,
            vec![(TokenKind::Removed, "1;"), (TokenKind::Added, "2;")]
        );
    }

    #[test]
    fn word_diff_uses_raw_text() {
        let options = NormalizationOptions {
            ignore_case: true,
            ..NormalizationOptions::exact()
        };
        let result = compare("Alpha beta", "ALPHA gamma", &options, true);
        let EditOperation::Modified {
            word_diff: Some(tokens),
            ..
        } = &result.operations[0]
        else {
            panic!("expected a word diff");
        };
        assert_eq!(tokens[0].kind, TokenKind::Removed);
        assert_eq!(tokens[0].content, "Alpha");
    }

    #[test]
    fn case_insensitive_equivalence() {
        let options = NormalizationOptions {
            ignore_case: true,
            ..NormalizationOptions::exact()
        };
        let result = compare("Hello", "HELLO", &options, true);
        assert_eq!(kinds(&result), vec!["context"]);
    }

    #[test]
    fn whitespace_policies_hide_formatting_changes() {
        let options = NormalizationOptions {
            ignore_case: false,
            trim_whitespace: true,
            ignore_intra_whitespace: true,
            collapse_blank_lines: true,
        };
        let result = compare("a  b\n\n\n  c", "a b\n\nc  ", &options, false);
        assert_eq!(kinds(&result), vec!["context"; 3]);
        assert_eq!(result.stats.similarity, 1.0);
    }

    #[test]
    fn stats_use_collapsed_lengths() {
        let options = NormalizationOptions {
            collapse_blank_lines: true,
            ..NormalizationOptions::exact()
        };
        // Left collapses to 3 entries, right has 3 entries.
        let result = compare("a\n\n\n\nb", "a\n\nc", &options, false);
        assert_eq!(result.stats.unchanged, 2);
        assert!((result.stats.similarity - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_inputs() {
        let result = compare("", "", &NormalizationOptions::exact(), true);
        assert!(result.operations.is_empty());
        assert_eq!(result.stats.similarity, 0.0);

        let inserted = compare("", "x\ny", &NormalizationOptions::exact(), true);
        assert_eq!(kinds(&inserted), vec!["added", "added"]);
    }

    #[test]
    fn comparison_exports() {
        let result = compare("a\nb", "a\nc", &NormalizationOptions::exact(), true);

        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["operations"][1]["type"], "modified");
        assert_eq!(json["operations"][1]["word_diff"][0]["type"], "removed");
        assert_eq!(json["stats"]["unchanged"], 1);

        assert_eq!(result.to_unified("a", "b"), "--- a\n+++ b\n a\n-b\n+c\n");
        assert_eq!(result.display().rows.len(), 2);
    }
}
