use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use markdown_tidy_config::Config;
use markdown_tidy_engine::{
    BridgeFormatter, CommandId, CursorPosition, Editor, IndentSettings, MarkupParser,
    MemoryEditor, Outcome, Tidy, Workspace,
};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "markdown-tidy")]
#[command(about = "Reformat a Markdown note without losing your place", long_about = None)]
#[command(version)]
struct Cli {
    /// Markdown file to format
    file: PathBuf,

    /// Cursor position as LINE:CH, zero-based
    #[arg(short, long, value_parser = parse_cursor)]
    cursor: Option<CursorPosition>,

    /// Format only the character range START..END
    #[arg(short, long, value_parser = parse_selection, conflicts_with = "save")]
    selection: Option<Range<usize>>,

    /// Run the pre-save hook instead of a command (honours format_on_save)
    #[arg(long)]
    save: bool,

    /// Write the result back to the file
    #[arg(short, long)]
    write: bool,

    /// Show unified diff of changes instead of the formatted note
    #[arg(short, long)]
    diff: bool,

    /// Config file to use instead of ~/.config/markdown-tidy/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Formatter bridge program and its arguments, overrides the config.
    /// Takes every remaining value, so give it last
    #[arg(long, num_args = 1.., value_name = "PROGRAM ARGS")]
    formatter: Option<Vec<String>>,

    /// Parse the note as MDX
    #[arg(long)]
    mdx: bool,

    /// Leave fenced code blocks alone
    #[arg(long)]
    no_embedded_code: bool,

    /// Indent width handed to the formatter
    #[arg(long, default_value_t = 4)]
    tab_width: usize,

    /// Indent with tabs
    #[arg(long)]
    use_tabs: bool,
}

/// A single open note standing in for the host application.
struct NoteHost {
    editor: MemoryEditor,
}

impl Workspace for NoteHost {
    type Editor = MemoryEditor;

    fn active_editor(&mut self) -> Option<&mut MemoryEditor> {
        Some(&mut self.editor)
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("markdown-tidy failed: {e:#}");
        eprintln!("{} {e:#}", "✗".red());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let command = match &cli.formatter {
        Some(command) => command.clone(),
        None => config.formatter_command(),
    };
    let formatter =
        BridgeFormatter::from_command(&command).context("Formatter command is empty")?;
    log::info!("Using formatter `{}`", formatter.program());

    let tidy = Tidy::new(formatter)
        .with_format_on_save(config.format_on_save)
        .with_parser(if cli.mdx {
            MarkupParser::Mdx
        } else {
            MarkupParser::Markdown
        })
        .with_embedded_code(!cli.no_embedded_code);

    let original = fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    let mut editor = MemoryEditor::new(&original).with_indent(IndentSettings {
        tab_width: cli.tab_width,
        use_tabs: cli.use_tabs,
    });
    // Clamped to the note so the formatter never sees an offset past the end
    editor.set_cursor(cli.cursor.unwrap_or_default());
    if let Some(range) = cli.selection.clone() {
        editor.select(range);
    }
    let mut host = NoteHost { editor };

    let outcome = if cli.save {
        tidy.before_save(&mut host)?
    } else if cli.selection.is_some() {
        tidy.run(CommandId::FormatSelection, &mut host)?
    } else {
        tidy.run(CommandId::FormatNote, &mut host)?
    };
    eprintln!("{}", describe(outcome));

    let formatted = host.editor.value();
    if cli.diff {
        print!("{}", render_diff(&cli.file, &original, &formatted));
    } else if !cli.write {
        print!("{formatted}");
    }

    if cli.write && formatted != original {
        fs::write(&cli.file, &formatted)
            .with_context(|| format!("Failed to write {}", cli.file.display()))?;
        log::info!("Wrote {}", cli.file.display());
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file not found: {}", path.display())),
        None => Ok(Config::load_or_default()?),
    }
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Reformatted {
            cursor: Some(cursor),
        } => format!(
            "{} Reformatted, cursor at {}:{}",
            "✓".green(),
            cursor.line,
            cursor.ch
        ),
        Outcome::Reformatted { cursor: None } => format!("{} Reformatted selection", "✓".green()),
        Outcome::Unchanged => format!("{} Already formatted", "✓".green()),
        Outcome::OptedOut => format!("{} Note opts out of formatting", "-".dimmed()),
        Outcome::NothingToFormat => format!("{} Nothing to format", "-".dimmed()),
        Outcome::SaveFormattingDisabled => {
            format!("{} Format on save is disabled", "-".dimmed())
        }
    }
}

/// Unified diff of the note with coloured hunk headers and changed lines.
fn render_diff(file: &Path, original: &str, formatted: &str) -> String {
    let name = file.display();
    let diff = TextDiff::from_lines(original, formatted);
    let mut unified = diff.unified_diff();
    unified.context_radius(2);

    let mut out = format!(
        "{}\n{}\n",
        format!("--- {name}").bold(),
        format!("+++ {name}").bold()
    );
    for hunk in unified.iter_hunks() {
        out.push_str(&format!("{}\n", hunk.header().to_string().cyan()));
        for change in hunk.iter_changes() {
            let line = format!("{}{}", change.tag(), change.value().trim_end_matches('\n'));
            let line = match change.tag() {
                ChangeTag::Delete => line.red(),
                ChangeTag::Insert => line.green(),
                ChangeTag::Equal => line.normal(),
            };
            out.push_str(&format!("{line}\n"));
        }
    }
    out
}

fn parse_cursor(value: &str) -> Result<CursorPosition, String> {
    let (line, ch) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:CH, got `{value}`"))?;
    let line = line
        .trim()
        .parse()
        .map_err(|e| format!("invalid line `{line}`: {e}"))?;
    let ch = ch
        .trim()
        .parse()
        .map_err(|e| format!("invalid column `{ch}`: {e}"))?;
    Ok(CursorPosition::new(line, ch))
}

fn parse_selection(value: &str) -> Result<Range<usize>, String> {
    let (start, end) = value
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got `{value}`"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|e| format!("invalid start `{start}`: {e}"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|e| format!("invalid end `{end}`: {e}"))?;
    if end < start {
        return Err(format!("selection end {end} is before start {start}"));
    }
    Ok(start..end)
}
