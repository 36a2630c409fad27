//! Token-level changes inside a modified line pair.
//!
//! Lines are cut into alternating whitespace and non-whitespace runs, so a
//! change in spacing shows up as its own token. Matching is a greedy forward
//! scan rather than an LCS: on a mismatch the right side is searched ahead
//! for the current left token, and everything skipped over is reported as
//! added. Only when the left token appears nowhere ahead is it reported as
//! removed.

use crate::model::{TokenKind, WordToken};
use crate::normalize::WHITESPACE_RUN;
use smallvec::SmallVec;

/// Splits `text` on whitespace runs, keeping each run as a token.
///
/// Empty pieces (before leading or after trailing whitespace) are dropped, so
/// concatenating the tokens always reproduces `text`.
#[must_use]
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for m in WHITESPACE_RUN.find_iter(text) {
        if m.start() > last {
            tokens.push(&text[last..m.start()]);
        }
        tokens.push(m.as_str());
        last = m.end();
    }
    if last < text.len() {
        tokens.push(&text[last..]);
    }

    tokens
}

/// Compares two lines token by token.
///
/// Concatenating the `Unchanged` and `Removed` tokens gives back `left`;
/// concatenating the `Unchanged` and `Added` tokens gives back `right`.
#[must_use]
pub fn word_diff(left: &str, right: &str) -> Vec<WordToken> {
    let lhs = tokenize(left);
    let rhs = tokenize(right);
    let mut out = Vec::with_capacity(lhs.len().max(rhs.len()));
    let (mut i, mut j) = (0, 0);

    while i < lhs.len() || j < rhs.len() {
        if i >= lhs.len() {
            out.push(WordToken::new(TokenKind::Added, rhs[j]));
            j += 1;
        } else if j >= rhs.len() {
            out.push(WordToken::new(TokenKind::Removed, lhs[i]));
            i += 1;
        } else if lhs[i] == rhs[j] {
            out.push(WordToken::new(TokenKind::Unchanged, lhs[i]));
            i += 1;
            j += 1;
        } else if let Some(offset) = rhs[j + 1..].iter().position(|t| *t == lhs[i]) {
            let anchor = j + 1 + offset;
            out.extend(
                rhs[j..anchor]
                    .iter()
                    .map(|t| WordToken::new(TokenKind::Added, t)),
            );
            j = anchor;
        } else {
            out.push(WordToken::new(TokenKind::Removed, lhs[i]));
            i += 1;
        }
    }

    out
}

/// Byte ranges covered by tokens of `kind`, measured on the side that the
/// tokens of that kind belong to.
///
/// `Removed` ranges are columns in the left line, `Added` ranges are columns
/// in the right line. `Unchanged` tokens advance both sides.
pub(crate) fn token_columns(tokens: &[WordToken], kind: TokenKind) -> SmallVec<[(u32, u32); 4]> {
    let mut ranges = SmallVec::new();
    let mut col = 0u32;

    for token in tokens {
        let len = token.content.len() as u32;
        if token.kind == TokenKind::Unchanged {
            col += len;
        } else if token.kind == kind {
            ranges.push((col, col + len));
            col += len;
        }
    }

    ranges
}
