//! The external formatting engine and the request/result types it speaks.
//!
//! The engine never formats Markdown itself. It hands a [`FormatRequest`] to a
//! [`Formatter`] and trusts the returned cursor offset to point at the same
//! logical place in the formatted text.

use std::io::Write;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

/// Which markup grammar the formatter should parse the text with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupParser {
    #[default]
    Markdown,
    Mdx,
}

/// Style knobs passed through to the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOptions {
    pub tab_width: usize,
    pub use_tabs: bool,
    /// Format fenced code blocks with the formatter's language plugins
    pub format_embedded_code: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            use_tabs: false,
            format_embedded_code: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub parser: MarkupParser,
    pub style: StyleOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest<'a> {
    pub text: &'a str,
    /// Character offset of the cursor in `text`, when one should be tracked
    pub cursor_offset: Option<usize>,
    pub options: FormatOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatResult {
    pub formatted: String,
    /// Character offset in `formatted` matching the requested cursor offset
    #[serde(default)]
    pub cursor_offset: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Failed to start formatter `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("Formatter IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Formatter exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("Formatter spoke an invalid protocol message: {0}")]
    Protocol(#[from] serde_json::Error),
}

/// An opaque formatting engine.
pub trait Formatter {
    fn format(&self, request: &FormatRequest<'_>) -> Result<FormatResult, FormatError>;
}

impl<F> Formatter for F
where
    F: Fn(&FormatRequest<'_>) -> Result<FormatResult, FormatError>,
{
    fn format(&self, request: &FormatRequest<'_>) -> Result<FormatResult, FormatError> {
        self(request)
    }
}

/// Wire form of a request, one JSON object on the bridge's stdin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BridgeRequest<'a> {
    text: &'a str,
    cursor_offset: Option<usize>,
    parser: MarkupParser,
    tab_width: usize,
    use_tabs: bool,
    embedded_language_formatting: &'static str,
}

impl<'a> From<&FormatRequest<'a>> for BridgeRequest<'a> {
    fn from(request: &FormatRequest<'a>) -> Self {
        let style = request.options.style;
        Self {
            text: request.text,
            cursor_offset: request.cursor_offset,
            parser: request.options.parser,
            tab_width: style.tab_width,
            use_tabs: style.use_tabs,
            embedded_language_formatting: if style.format_embedded_code {
                "auto"
            } else {
                "off"
            },
        }
    }
}

/// Runs an external program that reads one JSON request on stdin and writes
/// one JSON result on stdout.
///
/// `scripts/prettier-bridge.mjs` implements the other end with prettier's
/// `formatWithCursor`. Offsets on the wire are code point offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeFormatter {
    program: String,
    args: Vec<String>,
}

impl BridgeFormatter {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a command line such as `["node", "scripts/prettier-bridge.mjs"]`.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.iter().cloned()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Formatter for BridgeFormatter {
    fn format(&self, request: &FormatRequest<'_>) -> Result<FormatResult, FormatError> {
        let payload = serde_json::to_vec(&BridgeRequest::from(request))?;

        log::debug!("Running formatter bridge `{}`", self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| FormatError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(FormatError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}
