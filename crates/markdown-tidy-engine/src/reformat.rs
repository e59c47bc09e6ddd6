//! Position-preserving reformat of a whole document or a selection.
//!
//! ## Whole document
//!
//! 1. Encode the editor cursor as a character offset.
//! 2. Format the text, asking the formatter to track that offset.
//! 3. Normalize list markers in the output ([`correct_text`]).
//! 4. Stop if the result equals the input.
//! 5. Move the tracked offset through the same normalization
//!    ([`correct_offset`]) and decode it back to a cursor position.
//! 6. Replace the text, place the cursor, restore the viewport read before the
//!    replacement.
//!
//! ## Selection
//!
//! The selected text is formatted without a cursor, normalized, and written
//! back over the selection. Cursor placement is left to the editor.

use serde::Serialize;

use crate::formatter::{FormatError, FormatOptions, FormatRequest, Formatter};
use crate::host::Editor;
use crate::list_markers::{correct_offset, correct_text};
use crate::position::{CursorPosition, offset_to_position, position_to_offset};

/// What a reformat did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Text was replaced. `cursor` is set for whole-document reformats.
    Reformatted { cursor: Option<CursorPosition> },
    /// Formatting produced the input again; nothing was touched
    Unchanged,
    /// The document's front matter disables formatting
    OptedOut,
    /// No active editor, empty document or empty selection
    NothingToFormat,
    /// A save happened with format-on-save turned off
    SaveFormattingDisabled,
}

/// Replacement text and cursor for a whole-document reformat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reformatted {
    pub text: String,
    pub cursor: CursorPosition,
}

/// Format `text` and work out where `cursor` ends up. `None` when the
/// normalized output equals the input.
pub fn plan_reformat_all<F: Formatter + ?Sized>(
    text: &str,
    cursor: CursorPosition,
    formatter: &F,
    options: &FormatOptions,
) -> Result<Option<Reformatted>, FormatError> {
    let offset = position_to_offset(text, cursor);
    let result = formatter.format(&FormatRequest {
        text,
        cursor_offset: Some(offset),
        options: *options,
    })?;

    let formatted = correct_text(&result.formatted);
    if formatted == text {
        log::debug!("Document already formatted");
        return Ok(None);
    }

    let raw_offset = result.cursor_offset.unwrap_or_else(|| {
        log::warn!("Formatter returned no cursor offset, keeping offset {offset}");
        offset
    });
    let raw_offset = raw_offset.min(result.formatted.chars().count());

    let corrected = correct_offset(&result.formatted, raw_offset);
    let cursor = offset_to_position(&formatted, corrected);
    log::debug!("Cursor offset {offset} -> {raw_offset} -> {corrected} ({cursor:?})");

    Ok(Some(Reformatted {
        text: formatted,
        cursor,
    }))
}

/// Format a selection. `None` when the normalized output equals the input.
pub fn plan_reformat_selection<F: Formatter + ?Sized>(
    selected: &str,
    formatter: &F,
    options: &FormatOptions,
) -> Result<Option<String>, FormatError> {
    let result = formatter.format(&FormatRequest {
        text: selected,
        cursor_offset: None,
        options: *options,
    })?;

    let formatted = correct_text(&result.formatted);
    if formatted == selected {
        log::debug!("Selection already formatted");
        return Ok(None);
    }
    Ok(Some(formatted))
}

/// Reformat the whole document in `editor`, keeping cursor and viewport.
pub fn reformat_all<E, F>(
    editor: &mut E,
    formatter: &F,
    options: &FormatOptions,
) -> Result<Outcome, FormatError>
where
    E: Editor + ?Sized,
    F: Formatter + ?Sized,
{
    let text = editor.value();
    if text.is_empty() {
        return Ok(Outcome::NothingToFormat);
    }

    let Some(plan) = plan_reformat_all(&text, editor.cursor(), formatter, options)? else {
        return Ok(Outcome::Unchanged);
    };

    let scroll = editor.scroll_info();
    editor.set_value(&plan.text);
    editor.set_cursor(plan.cursor);
    editor.scroll_to(scroll.left, scroll.top);
    log::info!(
        "Reformatted document ({} -> {} chars)",
        text.chars().count(),
        plan.text.chars().count()
    );

    Ok(Outcome::Reformatted {
        cursor: Some(plan.cursor),
    })
}

/// Reformat the current selection in `editor`.
pub fn reformat_selection<E, F>(
    editor: &mut E,
    formatter: &F,
    options: &FormatOptions,
) -> Result<Outcome, FormatError>
where
    E: Editor + ?Sized,
    F: Formatter + ?Sized,
{
    let selected = editor.selection();
    if selected.is_empty() {
        return Ok(Outcome::NothingToFormat);
    }

    let Some(formatted) = plan_reformat_selection(&selected, formatter, options)? else {
        return Ok(Outcome::Unchanged);
    };

    editor.replace_selection(&formatted);
    log::info!("Reformatted selection");

    Ok(Outcome::Reformatted { cursor: None })
}
