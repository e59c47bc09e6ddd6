/*!
 * # markdown-tidy engine
 *
 * Reformats Markdown through an external formatter without losing the
 * user's place in the document.
 *
 * ## Module Structure
 *
 * - **`position`**: cursor (line, column) to character offset and back
 * - **`list_markers`**: list marker normalization and the matching offset shift
 * - **`formatter`**: the `Formatter` trait and the JSON bridge to an external engine
 * - **`reformat`**: whole-document and selection reformat over an `Editor`
 * - **`host`**: `Editor`/`Workspace` capabilities and the rope-backed `MemoryEditor`
 * - **`front_matter`**: per-document opt-out flag
 * - **`commands`**: command table and pre-save hook
 *
 * ## Usage Pattern
 *
 * ```rust
 * use markdown_tidy_engine::*;
 *
 * let formatter = |request: &FormatRequest<'_>| -> Result<FormatResult, FormatError> {
 *     Ok(FormatResult {
 *         formatted: request.text.replace("*   ", "-   "),
 *         cursor_offset: request.cursor_offset,
 *     })
 * };
 *
 * let tidy = Tidy::new(formatter);
 * let mut workspace = Some(MemoryEditor::new("*   item").with_cursor(CursorPosition::new(0, 6)));
 *
 * let outcome = tidy.run(CommandId::FormatNote, &mut workspace).unwrap();
 *
 * assert_eq!(workspace.as_ref().unwrap().value(), "- item");
 * assert_eq!(outcome, Outcome::Reformatted { cursor: Some(CursorPosition::new(0, 4)) });
 * ```
 */

pub mod commands;
pub mod formatter;
pub mod front_matter;
pub mod host;
pub mod list_markers;
pub mod position;
pub mod reformat;

// Re-export key types for easier usage
pub use commands::{CommandId, Tidy};
pub use formatter::*;
pub use host::*;
pub use position::{CursorPosition, offset_to_position, position_to_offset};
pub use reformat::*;
