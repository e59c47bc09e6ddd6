//! Conversion between editor cursor positions and linear text offsets.
//!
//! Offsets count characters (Unicode scalar values), not bytes, and a newline
//! counts as one character. Lines are whatever `str::split('\n')` yields, so a
//! trailing newline produces a final empty line.

use serde::{Deserialize, Serialize};

/// A cursor location as the editor sees it: zero-based line and column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line: usize,
    pub ch: usize,
}

impl CursorPosition {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// Encode a (line, column) position as a character offset into `text`.
///
/// Every line before `position.line` contributes its length plus one for the
/// newline that `split` removed; the target line contributes `position.ch`.
pub fn position_to_offset(text: &str, position: CursorPosition) -> usize {
    text.split('\n')
        .take(position.line + 1)
        .enumerate()
        .map(|(index, line)| {
            if index < position.line {
                line.chars().count() + 1
            } else {
                position.ch
            }
        })
        .sum()
}

/// Decode a character offset into `text` as a (line, column) position.
///
/// Offsets past the end of the text decode to the end of the text.
pub fn offset_to_position(text: &str, offset: usize) -> CursorPosition {
    let mut line = 0;
    let mut line_start = 0;
    let mut consumed = 0;

    for (index, c) in text.chars().take(offset).enumerate() {
        consumed = index + 1;
        if c == '\n' {
            line += 1;
            line_start = index + 1;
        }
    }

    CursorPosition {
        line,
        ch: consumed - line_start,
    }
}

/// Byte index of the `offset`-th character, or `text.len()` past the end.
pub(crate) fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(index, _)| index)
}
