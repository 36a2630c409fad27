//! Turns raw input text into the sequence of lines the aligner compares.

use crate::model::{NormalizationOptions, SourceLine};
use regex::Regex;
use std::sync::LazyLock;

/// Any run of whitespace, as matched by `\s+`.
pub(crate) static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// Splits `text` into lines and applies the normalization policies.
///
/// `\r\n` is folded to `\n` first so indices do not depend on the platform
/// the text came from. Empty input produces no lines at all; otherwise every
/// `\n` separates two lines, so a trailing newline yields a trailing empty
/// line.
///
/// With `collapse_blank_lines`, a normalized-empty line directly after a
/// retained normalized-empty line is dropped. Indices keep referring to the
/// original positions, so the result may skip numbers.
#[must_use]
pub fn normalize(text: &str, options: &NormalizationOptions) -> Vec<SourceLine> {
    if text.is_empty() {
        return Vec::new();
    }

    let text = text.replace("\r\n", "\n");
    let mut lines: Vec<SourceLine> = Vec::new();

    for (i, raw) in text.split('\n').enumerate() {
        let normalized = normalize_line(raw, options);

        if options.collapse_blank_lines
            && normalized.is_empty()
            && lines.last().is_some_and(|prev| prev.normalized.is_empty())
        {
            continue;
        }

        lines.push(SourceLine {
            raw: raw.to_owned(),
            normalized,
            index: i + 1,
        });
    }

    tracing::trace!(retained = lines.len(), "normalized input");
    lines
}

/// Trim, then collapse internal whitespace, then fold case.
fn normalize_line(raw: &str, options: &NormalizationOptions) -> String {
    let mut line = if options.trim_whitespace {
        raw.trim().to_owned()
    } else {
        raw.to_owned()
    };

    if options.ignore_intra_whitespace {
        line = WHITESPACE_RUN.replace_all(&line, " ").into_owned();
    }

    if options.ignore_case {
        line = line.to_lowercase();
    }

    line
}

/// Number of lines `text` splits into, without building the sequence.
///
/// Agrees with `normalize(text, ..).len()` whenever blank lines are not
/// collapsed.
#[must_use]
pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    // Folding `\r\n` to `\n` never changes the number of `\n` bytes.
    text.bytes().filter(|&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(
        ignore_case: bool,
        trim_whitespace: bool,
        ignore_intra_whitespace: bool,
        collapse_blank_lines: bool,
    ) -> NormalizationOptions {
        NormalizationOptions {
            ignore_case,
            trim_whitespace,
            ignore_intra_whitespace,
            collapse_blank_lines,
        }
    }

    fn normalized(lines: &[SourceLine]) -> Vec<&str> {
        lines.iter().map(|l| l.normalized.as_str()).collect()
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(normalize("", &NormalizationOptions::exact()).is_empty());
        assert_eq!(line_count(""), 0);
    }

    #[test]
    fn exact_keeps_text_and_numbers_lines() {
        let lines = normalize("a\nb\nc", &NormalizationOptions::exact());
        assert_eq!(normalized(&lines), vec!["a", "b", "c"]);
        assert_eq!(
            lines.iter().map(|l| l.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn crlf_and_lf_produce_same_lines() {
        let unix = normalize("one\ntwo\n", &NormalizationOptions::exact());
        let windows = normalize("one\r\ntwo\r\n", &NormalizationOptions::exact());
        assert_eq!(unix, windows);
        assert_eq!(unix.len(), 3);
        assert_eq!(unix[2].raw, "");
        assert_eq!(line_count("one\r\ntwo\r\n"), 3);
    }

    #[test]
    fn trim_only_touches_ends() {
        let lines = normalize("  a   b  ", &opts(false, true, false, false));
        assert_eq!(lines[0].normalized, "a   b");
        assert_eq!(lines[0].raw, "  a   b  ");
    }

    #[test]
    fn intra_whitespace_collapses_every_run() {
        let lines = normalize(" a \t b  ", &opts(false, false, true, false));
        assert_eq!(lines[0].normalized, " a b ");
    }

    #[test]
    fn all_policies_apply_in_order() {
        let lines = normalize("  Hello   WORLD \t", &opts(true, true, true, false));
        assert_eq!(lines[0].normalized, "hello world");
    }

    #[test]
    fn case_folding_keeps_raw() {
        let lines = normalize("HELLO", &opts(true, false, false, false));
        assert_eq!(lines[0].normalized, "hello");
        assert_eq!(lines[0].raw, "HELLO");
    }

    #[test]
    fn collapse_blank_lines_keeps_first_of_run() {
        let lines = normalize("a\n\n\nb", &opts(false, false, false, true));
        assert_eq!(normalized(&lines), vec!["a", "", "b"]);
        assert_eq!(
            lines.iter().map(|l| l.index).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
    }

    #[test]
    fn collapse_uses_normalized_emptiness() {
        // Whitespace-only lines only count as blank once trimmed.
        let untrimmed = normalize("a\n  \n\t\nb", &opts(false, false, false, true));
        assert_eq!(untrimmed.len(), 4);

        let trimmed = normalize("a\n  \n\t\nb", &opts(false, true, false, true));
        assert_eq!(trimmed.len(), 3);
        assert_eq!(trimmed[1].raw, "  ");
        assert_eq!(trimmed[2].index, 4);
    }

    #[test]
    fn without_collapse_blank_runs_survive() {
        let lines = normalize("a\n\n\nb", &NormalizationOptions::exact());
        assert_eq!(lines.len(), 4);
    }
}
