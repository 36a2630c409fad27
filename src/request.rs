//! Comparison requests: decoding, size guarding, and batch execution.
//!
//! A request bundles everything one comparison needs. Requests are
//! independent of each other, so a batch runs them in parallel.
//!
//! ## JSON Format
//!
//! Two layouts are accepted by [`parse`]:
//!
//! - a JSON array of request objects: `[{...}, {...}]`
//! - newline-separated request objects: `{...}\n{...}`
//!
//! ```json
//! {
//!   "left": "a\nb\nc",
//!   "right": "a\nx\nc",
//!   "options": {
//!     "ignore_case": false,
//!     "trim_whitespace": true,
//!     "ignore_intra_whitespace": false,
//!     "collapse_blank_lines": false
//!   },
//!   "word_diff": true,
//!   "max_lines": 2000,
//!   "max_cells": 4000000
//! }
//! ```

use crate::error::{CompareError, Side};
use crate::model::NormalizationOptions;
use crate::normalize::line_count;
use crate::{Comparison, compare};
use rayon::prelude::*;
use serde::Deserialize;

/// Line limit applied to each side when a request does not set its own.
pub const DEFAULT_MAX_LINES: usize = 10_000;

/// Alignment table size allowed when a request does not set its own.
///
/// The table holds one `u32` per cell, so this caps it at 64 MiB.
pub const DEFAULT_MAX_CELLS: usize = 16_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompareRequest {
    pub left: String,
    pub right: String,
    pub options: NormalizationOptions,
    /// Compute token-level changes for modified lines.
    pub word_diff: bool,
    /// Per-side line limit, defaulting to [`DEFAULT_MAX_LINES`].
    #[serde(default)]
    pub max_lines: Option<usize>,
    /// Limit on `(left_lines + 1) * (right_lines + 1)`, defaulting to
    /// [`DEFAULT_MAX_CELLS`].
    #[serde(default)]
    pub max_cells: Option<usize>,
}

impl CompareRequest {
    #[must_use]
    pub fn new(
        left: impl Into<String>,
        right: impl Into<String>,
        options: NormalizationOptions,
        word_diff: bool,
    ) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            options,
            word_diff,
            max_lines: None,
            max_cells: None,
        }
    }

    #[must_use]
    pub fn with_max_lines(mut self, limit: usize) -> Self {
        self.max_lines = Some(limit);
        self
    }

    #[must_use]
    pub fn with_max_cells(mut self, limit: usize) -> Self {
        self.max_cells = Some(limit);
        self
    }

    /// Rejects inputs that are too long on either side, or whose alignment
    /// table would exceed the cell limit.
    ///
    /// The aligner is quadratic, so this runs before any table is built.
    pub fn check_size(&self) -> Result<(), CompareError> {
        let limit = self.max_lines.unwrap_or(DEFAULT_MAX_LINES);
        let left_lines = line_count(&self.left);
        let right_lines = line_count(&self.right);

        for (side, lines) in [(Side::Left, left_lines), (Side::Right, right_lines)] {
            if lines > limit {
                tracing::warn!(%side, lines, limit, "rejecting oversized comparison input");
                return Err(CompareError::InputTooLarge { side, lines, limit });
            }
        }

        let limit = self.max_cells.unwrap_or(DEFAULT_MAX_CELLS);
        let cells = (left_lines + 1).saturating_mul(right_lines + 1);
        if cells > limit {
            tracing::warn!(cells, limit, "rejecting comparison with oversized alignment table");
            return Err(CompareError::TableTooLarge { cells, limit });
        }

        Ok(())
    }

    /// Checks the size limit and runs the comparison.
    pub fn run(&self) -> Result<Comparison, CompareError> {
        self.check_size()?;
        Ok(compare(
            &self.left,
            &self.right,
            &self.options,
            self.word_diff,
        ))
    }
}

/// Parses one or more requests from JSON.
pub fn parse(json: &str) -> Result<Vec<CompareRequest>, CompareError> {
    // Try array format first
    if let Ok(requests) = serde_json::from_str::<Vec<CompareRequest>>(json) {
        return Ok(requests);
    }

    // Fall back to newline-separated objects
    json.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(CompareError::from))
        .collect()
}

/// Runs every request in parallel. Results keep the order of `requests`.
#[must_use]
pub fn compare_all(requests: &[CompareRequest]) -> Vec<Result<Comparison, CompareError>> {
    tracing::debug!(count = requests.len(), "running comparison batch");
    requests.par_iter().map(CompareRequest::run).collect()
}
