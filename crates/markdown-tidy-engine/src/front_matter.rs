//! Per-document settings read from YAML-style front matter.
//!
//! Only a `---` fenced block at the very start of the document counts. Values
//! are read line by line as `key: value`, with an optional trailing `#`
//! comment; nested YAML is not interpreted.

use pulldown_cmark::{Event, MetadataBlockKind, Options, Parser, Tag, TagEnd};
use regex::Regex;

/// Front matter key that opts a document out of formatting when true.
pub const DEFAULT_OPT_OUT_KEY: &str = "format-ignore";

/// Body of the leading front matter block, without the fences.
pub fn front_matter(text: &str) -> Option<String> {
    let mut events = Parser::new_ext(text, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    if !matches!(
        events.next(),
        Some(Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)))
    ) {
        return None;
    }

    let mut body = String::new();
    for event in events {
        match event {
            Event::Text(text) => body.push_str(&text),
            Event::End(TagEnd::MetadataBlock(_)) => break,
            _ => {}
        }
    }
    Some(body)
}

/// Boolean value of `key` in the front matter, if present and readable.
pub fn flag(text: &str, key: &str) -> Option<bool> {
    let body = front_matter(text)?;
    let pattern = format!(
        r#"(?m)^{}[ \t]*:[ \t]*["']?([A-Za-z]+)["']?[ \t]*(?:#.*)?$"#,
        regex::escape(key)
    );
    let key_regex = Regex::new(&pattern).ok()?;
    let value = key_regex.captures(&body)?.get(1)?.as_str();

    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Whether the document asks not to be formatted. Absent means allowed.
pub fn is_opted_out(text: &str, key: &str) -> bool {
    flag(text, key).unwrap_or(false)
}
