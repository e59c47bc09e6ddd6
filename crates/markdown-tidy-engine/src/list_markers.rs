//! Normalization of bullet list markers in formatter output.
//!
//! The formatter sometimes emits `*` bullets or pads a marker with extra
//! spaces. Every such line is rewritten to the canonical `- ` form. The
//! rewrite is line-local, so correcting a prefix of the text yields a prefix
//! of the corrected text, which is what lets [`correct_offset`] move a cursor
//! through the same rewrite.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::position::byte_index;

fn marker_regex() -> &'static Regex {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKER_REGEX
        .get_or_init(|| Regex::new(r"(?m)^( *)[-*] +").expect("Invalid list marker regex"))
}

/// Rewrite every `-`/`*` bullet followed by spaces to `- `, keeping the
/// leading indentation and the rest of the line.
pub fn correct_text(text: &str) -> String {
    match marker_regex().replace_all(text, "${1}- ") {
        Cow::Borrowed(unchanged) => unchanged.to_string(),
        Cow::Owned(corrected) => corrected,
    }
}

/// Map a character offset in `raw` to the matching offset in `correct_text(raw)`.
pub fn correct_offset(raw: &str, raw_offset: usize) -> usize {
    let prefix = &raw[..byte_index(raw, raw_offset)];
    correct_text(prefix).chars().count()
}
