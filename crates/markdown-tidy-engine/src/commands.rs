//! Host-facing commands and the pre-save hook.
//!
//! [`Tidy`] checks the document's opt-out flag, builds format options from the
//! editor's indent settings and hands off to [`crate::reformat`].

use crate::formatter::{FormatError, FormatOptions, Formatter, MarkupParser, StyleOptions};
use crate::front_matter::{DEFAULT_OPT_OUT_KEY, is_opted_out};
use crate::host::{Editor, Workspace};
use crate::reformat::{Outcome, reformat_all, reformat_selection};

/// User-invokable actions a host registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    FormatNote,
    FormatSelection,
}

impl CommandId {
    pub const ALL: [CommandId; 2] = [CommandId::FormatNote, CommandId::FormatSelection];

    /// Stable identifier used for registration and keybindings
    pub fn id(self) -> &'static str {
        match self {
            CommandId::FormatNote => "format-note",
            CommandId::FormatSelection => "format-selection",
        }
    }

    /// Name shown in the host's command palette
    pub fn name(self) -> &'static str {
        match self {
            CommandId::FormatNote => "Format the entire note",
            CommandId::FormatSelection => "Format just the selection in the note",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }
}

/// Command dispatcher and pre-save hook around a formatter.
#[derive(Debug, Clone)]
pub struct Tidy<F> {
    formatter: F,
    format_on_save: bool,
    opt_out_key: String,
    parser: MarkupParser,
    format_embedded_code: bool,
}

impl<F: Formatter> Tidy<F> {
    pub fn new(formatter: F) -> Self {
        Self {
            formatter,
            format_on_save: false,
            opt_out_key: DEFAULT_OPT_OUT_KEY.to_string(),
            parser: MarkupParser::Markdown,
            format_embedded_code: true,
        }
    }

    pub fn with_format_on_save(mut self, format_on_save: bool) -> Self {
        self.format_on_save = format_on_save;
        self
    }

    pub fn with_opt_out_key(mut self, key: impl Into<String>) -> Self {
        self.opt_out_key = key.into();
        self
    }

    pub fn with_parser(mut self, parser: MarkupParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_embedded_code(mut self, format_embedded_code: bool) -> Self {
        self.format_embedded_code = format_embedded_code;
        self
    }

    pub fn format_on_save(&self) -> bool {
        self.format_on_save
    }

    pub fn set_format_on_save(&mut self, format_on_save: bool) {
        self.format_on_save = format_on_save;
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Run a command against the workspace's active editor.
    pub fn run<W: Workspace>(
        &self,
        command: CommandId,
        workspace: &mut W,
    ) -> Result<Outcome, FormatError> {
        let Some(editor) = workspace.active_editor() else {
            log::debug!("No active editor for {}", command.id());
            return Ok(Outcome::NothingToFormat);
        };

        if is_opted_out(&editor.value(), &self.opt_out_key) {
            log::debug!("Document opts out via `{}`", self.opt_out_key);
            return Ok(Outcome::OptedOut);
        }

        let options = self.options_for(&*editor);
        match command {
            CommandId::FormatNote => reformat_all(editor, &self.formatter, &options),
            CommandId::FormatSelection => reformat_selection(editor, &self.formatter, &options),
        }
    }

    /// Pre-save hook: format the entire note when format-on-save is enabled.
    pub fn before_save<W: Workspace>(&self, workspace: &mut W) -> Result<Outcome, FormatError> {
        if !self.format_on_save {
            return Ok(Outcome::SaveFormattingDisabled);
        }
        self.run(CommandId::FormatNote, workspace)
    }

    fn options_for<E: Editor + ?Sized>(&self, editor: &E) -> FormatOptions {
        let indent = editor.indent_settings();
        FormatOptions {
            parser: self.parser,
            style: StyleOptions {
                tab_width: indent.tab_width,
                use_tabs: indent.use_tabs,
                format_embedded_code: self.format_embedded_code,
            },
        }
    }
}
