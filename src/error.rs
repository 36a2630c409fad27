//! Errors raised while decoding and size-guarding comparison requests.

use thiserror::Error;

/// Which input of a comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

/// Errors raised around the comparison core.
///
/// The core itself cannot fail; these come from the request layer that
/// guards and decodes inputs before handing them over.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("{side} input has {lines} lines, more than the limit of {limit}")]
    InputTooLarge {
        side: Side,
        lines: usize,
        limit: usize,
    },

    #[error("comparison needs {cells} alignment table cells, more than the limit of {limit}")]
    TableTooLarge { cells: usize, limit: usize },

    #[error("Failed to parse comparison request: {0}")]
    Parse(#[from] serde_json::Error),
}
