//! Lua bindings, loaded via `require("linediff_nvim")`.
//!
//! ## Exports
//!
//! - `compare(left, right, opts)` - edit script, stats and display rows
//! - `unified(left, right, opts, left_label, right_label)` - unified-diff text
//! - `compare_json(json)` - a batch of JSON requests, run in parallel
//!
//! `opts` must set the booleans `ignore_case`, `trim_whitespace`,
//! `ignore_intra_whitespace`, `collapse_blank_lines` and `word_diff`.
//! `max_lines` and `max_cells` are optional.

use crate::error::CompareError;
use crate::model::{
    DiffStats, EditOperation, NormalizationOptions, SourceLine, TokenKind, WordToken,
};
use crate::processor::{DisplayDiff, HighlightRegion, Row, Side};
use crate::request::{self, CompareRequest};
use crate::{Comparison, compare_all};
use mlua::prelude::*;

/// Reads a boolean that the caller is required to set.
fn required_flag(table: &LuaTable, key: &str) -> LuaResult<bool> {
    match table.get::<LuaValue>(key)? {
        LuaValue::Boolean(flag) => Ok(flag),
        other => Err(LuaError::RuntimeError(format!(
            "option `{key}` must be a boolean, got {}",
            other.type_name()
        ))),
    }
}

/// Builds a request from two texts and a Lua options table.
fn request_from_lua(left: String, right: String, opts: &LuaTable) -> LuaResult<CompareRequest> {
    let options = NormalizationOptions {
        ignore_case: required_flag(opts, "ignore_case")?,
        trim_whitespace: required_flag(opts, "trim_whitespace")?,
        ignore_intra_whitespace: required_flag(opts, "ignore_intra_whitespace")?,
        collapse_blank_lines: required_flag(opts, "collapse_blank_lines")?,
    };
    let mut request = CompareRequest::new(left, right, options, required_flag(opts, "word_diff")?);
    request.max_lines = opts.get::<Option<usize>>("max_lines")?;
    request.max_cells = opts.get::<Option<usize>>("max_cells")?;
    Ok(request)
}

#[inline]
fn to_lua_error(err: CompareError) -> LuaError {
    LuaError::RuntimeError(err.to_string())
}

/// Converts a comparison into the table handed to the viewer.
fn comparison_table(lua: &Lua, comparison: Comparison) -> LuaResult<LuaTable> {
    let display = comparison.display();

    let operations: Vec<LuaValue> = comparison
        .operations
        .into_iter()
        .map(|op| op.into_lua(lua))
        .collect::<LuaResult<_>>()?;

    let result = display_table(lua, display)?;
    result.set("operations", lua.create_sequence_from(operations)?)?;
    Ok(result)
}

/// Rows, hunk starts and stats of a laid-out comparison.
fn display_table(lua: &Lua, display: DisplayDiff) -> LuaResult<LuaTable> {
    let table = lua.create_table()?;

    let rows: Vec<LuaValue> = display
        .rows
        .into_iter()
        .map(|r| r.into_lua(lua))
        .collect::<LuaResult<_>>()?;
    table.set("rows", lua.create_sequence_from(rows)?)?;
    table.set("hunk_starts", lua.create_sequence_from(display.hunk_starts)?)?;
    table.set("stats", display.stats.into_lua(lua)?)?;

    Ok(table)
}

/// Compares two texts.
///
/// Returns `{ operations, rows, hunk_starts, stats }`.
fn compare(lua: &Lua, (left, right, opts): (String, String, LuaTable)) -> LuaResult<LuaTable> {
    let comparison = request_from_lua(left, right, &opts)?
        .run()
        .map_err(to_lua_error)?;
    comparison_table(lua, comparison)
}

/// Compares two texts and renders the result as unified-diff text.
fn unified(
    _lua: &Lua,
    (left, right, opts, left_label, right_label): (String, String, LuaTable, String, String),
) -> LuaResult<String> {
    let comparison = request_from_lua(left, right, &opts)?
        .run()
        .map_err(to_lua_error)?;
    Ok(comparison.to_unified(&left_label, &right_label))
}

/// Runs a batch of JSON-encoded requests in parallel.
///
/// Each entry of the returned list is either `{ ok = <result> }` or
/// `{ err = <message> }`, in request order.
fn compare_json(lua: &Lua, json: String) -> LuaResult<LuaTable> {
    let requests = request::parse(&json).map_err(to_lua_error)?;

    let results = lua.create_table()?;
    for (i, outcome) in compare_all(&requests).into_iter().enumerate() {
        let entry = lua.create_table()?;
        match outcome {
            Ok(comparison) => entry.set("ok", comparison_table(lua, comparison)?)?,
            Err(err) => entry.set("err", err.to_string())?,
        }
        results.set(i + 1, entry)?;
    }
    Ok(results)
}

impl IntoLua for SourceLine {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set("raw", self.raw)?;
        table.set("normalized", self.normalized)?;
        table.set("index", self.index)?;
        Ok(LuaValue::Table(table))
    }
}

impl IntoLua for WordToken {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set(
            "type",
            match self.kind {
                TokenKind::Unchanged => "unchanged",
                TokenKind::Added => "added",
                TokenKind::Removed => "removed",
            },
        )?;
        table.set("content", self.content)?;
        Ok(LuaValue::Table(table))
    }
}

impl IntoLua for EditOperation {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set("type", self.kind())?;

        match self {
            EditOperation::Context { left, right } => {
                table.set("left", left.into_lua(lua)?)?;
                table.set("right", right.into_lua(lua)?)?;
            }
            EditOperation::Added { right } => table.set("right", right.into_lua(lua)?)?,
            EditOperation::Removed { left } => table.set("left", left.into_lua(lua)?)?,
            EditOperation::Modified {
                left,
                right,
                word_diff,
            } => {
                table.set("left", left.into_lua(lua)?)?;
                table.set("right", right.into_lua(lua)?)?;
                if let Some(tokens) = word_diff {
                    let tokens: Vec<LuaValue> = tokens
                        .into_iter()
                        .map(|t| t.into_lua(lua))
                        .collect::<LuaResult<_>>()?;
                    table.set("word_diff", lua.create_sequence_from(tokens)?)?;
                }
            }
        }

        Ok(LuaValue::Table(table))
    }
}

impl IntoLua for DiffStats {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set("added", self.added)?;
        table.set("removed", self.removed)?;
        table.set("modified", self.modified)?;
        table.set("unchanged", self.unchanged)?;
        table.set("similarity", self.similarity)?;
        Ok(LuaValue::Table(table))
    }
}

impl IntoLua for HighlightRegion {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set("start", self.start)?;
        table.set("end", self.end)?;
        Ok(LuaValue::Table(table))
    }
}

impl IntoLua for Side {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set("content", self.content)?;
        table.set("line_number", self.line_number)?;
        table.set("is_filler", self.is_filler)?;

        let highlights: Vec<LuaValue> = self
            .highlights
            .into_iter()
            .map(|h| h.into_lua(lua))
            .collect::<LuaResult<_>>()?;
        table.set("highlights", lua.create_sequence_from(highlights)?)?;

        Ok(LuaValue::Table(table))
    }
}

impl IntoLua for Row {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set("left", self.left.into_lua(lua)?)?;
        table.set("right", self.right.into_lua(lua)?)?;
        Ok(LuaValue::Table(table))
    }
}

/// Creates the Lua module exports. Called by mlua when loaded via `require("linediff_nvim")`.
#[mlua::lua_module]
fn linediff_nvim(lua: &Lua) -> LuaResult<LuaTable> {
    let exports = lua.create_table()?;
    exports.set(
        "compare",
        lua.create_function(|lua, args: (String, String, LuaTable)| compare(lua, args))?,
    )?;
    exports.set(
        "unified",
        lua.create_function(|lua, args: (String, String, LuaTable, String, String)| {
            unified(lua, args)
        })?,
    )?;
    exports.set(
        "compare_json",
        lua.create_function(|lua, json: String| compare_json(lua, json))?,
    )?;
    Ok(exports)
}
