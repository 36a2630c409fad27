//! Data model shared by every stage of the comparison pipeline.
//!
//! All values here are created fresh for a single comparison and are never
//! mutated afterwards. A [`SourceLine`] keeps both the text the user typed
//! (`raw`, used for display and export) and the text that takes part in the
//! comparison (`normalized`).
//!
//! ## JSON Shape
//!
//! Edit operations serialize with a `type` tag, which keeps the output easy to
//! walk from Lua or any other consumer:
//!
//! ```json
//! [
//!   {"type": "context", "left": {"raw": "a", "normalized": "a", "index": 1},
//!                       "right": {"raw": "a", "normalized": "a", "index": 1}},
//!   {"type": "modified", "left": {...}, "right": {...},
//!    "word_diff": [{"type": "removed", "content": "b"}, {"type": "added", "content": "x"}]}
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// One line of input after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLine {
    /// The line exactly as it appeared in the input (without the newline).
    pub raw: String,

    /// The value compared during alignment.
    pub normalized: String,

    /// 1-based position in the original input. Survives blank-line collapsing,
    /// so a normalized sequence may contain gaps.
    pub index: usize,
}

/// Controls what counts as "equal" when lines are compared.
///
/// There is no `Default`: every caller states every policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationOptions {
    pub ignore_case: bool,
    pub trim_whitespace: bool,
    pub ignore_intra_whitespace: bool,
    /// Contract runs of normalized-empty lines to their first line.
    pub collapse_blank_lines: bool,
}

impl NormalizationOptions {
    /// Options that compare lines byte for byte.
    #[must_use]
    pub const fn exact() -> Self {
        Self {
            ignore_case: false,
            trim_whitespace: false,
            ignore_intra_whitespace: false,
            collapse_blank_lines: false,
        }
    }
}

/// A single entry of the edit script.
///
/// The aligner only ever produces `Context`, `Added` and `Removed`;
/// `Modified` is introduced by [`crate::align::coalesce`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EditOperation {
    Context {
        left: SourceLine,
        right: SourceLine,
    },
    Added {
        right: SourceLine,
    },
    Removed {
        left: SourceLine,
    },
    Modified {
        left: SourceLine,
        right: SourceLine,
        /// Token-level changes between the two raw lines, when requested.
        word_diff: Option<Vec<WordToken>>,
    },
}

impl EditOperation {
    /// The left-hand line this operation refers to, if any.
    #[must_use]
    pub fn left(&self) -> Option<&SourceLine> {
        match self {
            Self::Context { left, .. } | Self::Removed { left } | Self::Modified { left, .. } => {
                Some(left)
            }
            Self::Added { .. } => None,
        }
    }

    /// The right-hand line this operation refers to, if any.
    #[must_use]
    pub fn right(&self) -> Option<&SourceLine> {
        match self {
            Self::Context { right, .. } | Self::Added { right } | Self::Modified { right, .. } => {
                Some(right)
            }
            Self::Removed { .. } => None,
        }
    }

    /// Short lowercase name of the variant, matching the serialized tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Context { .. } => "context",
            Self::Added { .. } => "added",
            Self::Removed { .. } => "removed",
            Self::Modified { .. } => "modified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Unchanged,
    Added,
    Removed,
}

/// A whitespace run or a non-whitespace run from one of the compared lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordToken {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub content: String,
}

impl WordToken {
    #[inline]
    pub(crate) fn new(kind: TokenKind, content: &str) -> Self {
        Self {
            kind,
            content: content.to_owned(),
        }
    }
}

/// Summary counts for one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
    /// `unchanged / max(left_len, right_len, 1)`, in `0.0..=1.0`.
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, index: usize) -> SourceLine {
        SourceLine {
            raw: text.into(),
            normalized: text.into(),
            index,
        }
    }

    #[test]
    fn sides_of_each_variant() {
        let added = EditOperation::Added { right: line("x", 1) };
        assert!(added.left().is_none());
        assert_eq!(added.right().map(|l| l.raw.as_str()), Some("x"));

        let removed = EditOperation::Removed { left: line("y", 2) };
        assert_eq!(removed.left().map(|l| l.index), Some(2));
        assert!(removed.right().is_none());

        let modified = EditOperation::Modified {
            left: line("a", 1),
            right: line("b", 1),
            word_diff: None,
        };
        assert!(modified.left().is_some() && modified.right().is_some());
        assert_eq!(modified.kind(), "modified");
    }

    #[test]
    fn operation_serializes_with_type_tag() {
        let op = EditOperation::Removed { left: line("gone", 3) };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "removed");
        assert_eq!(json["left"]["raw"], "gone");
        assert_eq!(json["left"]["index"], 3);
    }

    #[test]
    fn token_serializes_kind_as_type() {
        let token = WordToken::new(TokenKind::Added, "new");
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "added");
        assert_eq!(json["content"], "new");
    }

    #[test]
    fn options_require_every_field() {
        let partial = r#"{"ignore_case": true}"#;
        assert!(serde_json::from_str::<NormalizationOptions>(partial).is_err());

        let full = r#"{
            "ignore_case": true,
            "trim_whitespace": false,
            "ignore_intra_whitespace": false,
            "collapse_blank_lines": true
        }"#;
        let options: NormalizationOptions = serde_json::from_str(full).unwrap();
        assert!(options.ignore_case);
        assert!(options.collapse_blank_lines);
    }
}
