//! Plain-text export of an edit script in unified-diff style.
//!
//! Output starts with `---`/`+++` headers, followed by one line per side of
//! every operation, prefixed with `' '`, `'-'` or `'+'`. Lines are written
//! from `raw` text so normalization never leaks into the export.

use crate::model::EditOperation;

/// Renders `ops` as unified-diff text. Every output line ends with `\n`.
#[must_use]
pub fn to_unified(ops: &[EditOperation], left_label: &str, right_label: &str) -> String {
    let mut out = format!("--- {left_label}\n+++ {right_label}\n");

    for op in ops {
        match op {
            EditOperation::Context { left, .. } => push_line(&mut out, ' ', &left.raw),
            EditOperation::Removed { left } => push_line(&mut out, '-', &left.raw),
            EditOperation::Added { right } => push_line(&mut out, '+', &right.raw),
            EditOperation::Modified { left, right, .. } => {
                push_line(&mut out, '-', &left.raw);
                push_line(&mut out, '+', &right.raw);
            }
        }
    }

    out
}

#[inline]
fn push_line(out: &mut String, prefix: char, text: &str) {
    out.push(prefix);
    out.push_str(text);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare;
    use crate::model::NormalizationOptions;

    #[test]
    fn headers_only_for_empty_script() {
        assert_eq!(to_unified(&[], "a.txt", "b.txt"), "--- a.txt\n+++ b.txt\n");
    }

    #[test]
    fn modified_lines_export_both_sides() {
        let result = compare("a\nb\nc", "a\nx\nc", &NormalizationOptions::exact(), true);
        assert_eq!(
            to_unified(&result.operations, "left", "right"),
            "--- left\n+++ right\n a\n-b\n+x\n c\n"
        );
    }

    #[test]
    fn export_uses_raw_text() {
        let options = NormalizationOptions {
            ignore_case: true,
            trim_whitespace: true,
            ..NormalizationOptions::exact()
        };
        let result = compare("  Keep\nold", "KEEP\nnew\nmore", &options, false);
        assert_eq!(
            to_unified(&result.operations, "l", "r"),
            "--- l\n+++ r\n   Keep\n-old\n+new\n+more\n"
        );
    }
}
