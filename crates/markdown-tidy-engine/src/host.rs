//! The capabilities the engine needs from a host editor.
//!
//! A host implements [`Editor`] for its text views and [`Workspace`] to say
//! which one is active. [`MemoryEditor`] is a complete in-memory host used by
//! the CLI and the tests.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use xi_rope::Rope;

use crate::position::{CursorPosition, byte_index, offset_to_position, position_to_offset};

/// Viewport offset owned by the host. The engine only reads and restores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub left: f64,
    pub top: f64,
}

/// The host's indentation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentSettings {
    pub tab_width: usize,
    pub use_tabs: bool,
}

impl Default for IndentSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            use_tabs: false,
        }
    }
}

/// A text view the engine can read from and rewrite.
pub trait Editor {
    fn value(&self) -> String;
    fn set_value(&mut self, text: &str);
    /// Currently selected text, empty when nothing is selected
    fn selection(&self) -> String;
    fn replace_selection(&mut self, text: &str);
    fn cursor(&self) -> CursorPosition;
    fn set_cursor(&mut self, position: CursorPosition);
    fn scroll_info(&self) -> ScrollPosition;
    fn scroll_to(&mut self, left: f64, top: f64);
    fn indent_settings(&self) -> IndentSettings;
}

/// Access to whichever editor currently has focus.
pub trait Workspace {
    type Editor: Editor;

    fn active_editor(&mut self) -> Option<&mut Self::Editor>;
}

impl<E: Editor> Workspace for Option<E> {
    type Editor = E;

    fn active_editor(&mut self) -> Option<&mut E> {
        self.as_mut()
    }
}

/// Rope-backed editor with a cursor, an optional selection and a viewport.
///
/// Like a real editor view, replacing the whole value moves the cursor to the
/// start and resets the viewport.
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    buffer: Rope,
    cursor: CursorPosition,
    /// Selected character range, if any
    selection: Option<Range<usize>>,
    scroll: ScrollPosition,
    indent: IndentSettings,
    /// Incremented on every text mutation
    version: u64,
}

impl MemoryEditor {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            cursor: CursorPosition::default(),
            selection: None,
            scroll: ScrollPosition::default(),
            indent: IndentSettings::default(),
            version: 0,
        }
    }

    pub fn with_cursor(mut self, cursor: CursorPosition) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_scroll(mut self, left: f64, top: f64) -> Self {
        self.scroll = ScrollPosition { left, top };
        self
    }

    pub fn with_indent(mut self, indent: IndentSettings) -> Self {
        self.indent = indent;
        self
    }

    /// Select a character range, clamped to the text.
    pub fn select(&mut self, range: Range<usize>) {
        let len = self.char_len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        self.selection = Some(start..end);
    }

    pub fn selection_range(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn char_len(&self) -> usize {
        self.buffer.to_string().chars().count()
    }

    fn byte_range(&self, text: &str, range: &Range<usize>) -> Range<usize> {
        byte_index(text, range.start)..byte_index(text, range.end)
    }
}

impl Editor for MemoryEditor {
    fn value(&self) -> String {
        self.buffer.to_string()
    }

    fn set_value(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        self.cursor = CursorPosition::default();
        self.selection = None;
        self.scroll = ScrollPosition::default();
        self.version += 1;
    }

    fn selection(&self) -> String {
        match &self.selection {
            Some(range) => {
                let text = self.buffer.to_string();
                text[self.byte_range(&text, range)].to_string()
            }
            None => String::new(),
        }
    }

    fn replace_selection(&mut self, replacement: &str) {
        let Some(range) = self.selection.take() else {
            return;
        };
        let text = self.buffer.to_string();
        let bytes = self.byte_range(&text, &range);
        self.buffer.edit(bytes, replacement);
        self.version += 1;

        let end = range.start + replacement.chars().count();
        self.cursor = offset_to_position(&self.buffer.to_string(), end);
    }

    fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    fn set_cursor(&mut self, position: CursorPosition) {
        let text = self.buffer.to_string();
        let offset = position_to_offset(&text, position).min(text.chars().count());
        self.cursor = offset_to_position(&text, offset);
    }

    fn scroll_info(&self) -> ScrollPosition {
        self.scroll
    }

    fn scroll_to(&mut self, left: f64, top: f64) {
        self.scroll = ScrollPosition { left, top };
    }

    fn indent_settings(&self) -> IndentSettings {
        self.indent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_value_resets_view_state() {
        let mut editor = MemoryEditor::new("one\ntwo")
            .with_cursor(CursorPosition::new(1, 2))
            .with_scroll(3.0, 40.0);

        editor.set_value("three");

        assert_eq!(editor.value(), "three");
        assert_eq!(editor.cursor(), CursorPosition::new(0, 0));
        assert_eq!(editor.scroll_info(), ScrollPosition::default());
        assert_eq!(editor.version(), 1);
    }

    #[test]
    fn test_selection_is_empty_without_range() {
        let editor = MemoryEditor::new("text");
        assert_eq!(editor.selection(), "");
    }

    #[test]
    fn test_replace_selection_moves_cursor_to_end_of_insert() {
        let mut editor = MemoryEditor::new("intro\n*   a\n*   b\noutro");
        editor.select(6..17);
        assert_eq!(editor.selection(), "*   a\n*   b");

        editor.replace_selection("- a\n- b");

        assert_eq!(editor.value(), "intro\n- a\n- b\noutro");
        assert_eq!(editor.cursor(), CursorPosition::new(2, 3));
        assert_eq!(editor.selection_range(), None);
    }

    #[test]
    fn test_replace_selection_with_multibyte_text() {
        let mut editor = MemoryEditor::new("héllo wörld");
        editor.select(6..11);

        editor.replace_selection("ñ");

        assert_eq!(editor.value(), "héllo ñ");
        assert_eq!(editor.cursor(), CursorPosition::new(0, 7));
    }

    #[test]
    fn test_replace_selection_without_selection_is_ignored() {
        let mut editor = MemoryEditor::new("text");
        editor.replace_selection("other");
        assert_eq!(editor.value(), "text");
        assert_eq!(editor.version(), 0);
    }

    #[test]
    fn test_select_clamps_to_text() {
        let mut editor = MemoryEditor::new("abc");
        editor.select(1..99);
        assert_eq!(editor.selection_range(), Some(1..3));
    }

    #[test]
    fn test_set_cursor_clamps_to_text() {
        let mut editor = MemoryEditor::new("ab\ncd");
        editor.set_cursor(CursorPosition::new(1, 10));
        assert_eq!(editor.cursor(), CursorPosition::new(1, 2));
    }

    #[test]
    fn test_option_workspace_exposes_active_editor() {
        let mut workspace: Option<MemoryEditor> = None;
        assert!(workspace.active_editor().is_none());

        let mut workspace = Some(MemoryEditor::new("x"));
        assert_eq!(workspace.active_editor().map(|e| e.value()), Some("x".to_string()));
    }
}
