// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some content.\n\n-   Bullet point\n    *   Nested item\n*  Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

/// Rewrites every bullet to the padded `-   ` form and tracks the cursor by
/// formatting the text in front of it.
#[allow(dead_code)]
pub fn padding_formatter(
    request: &markdown_tidy_engine::FormatRequest<'_>,
) -> Result<markdown_tidy_engine::FormatResult, markdown_tidy_engine::FormatError> {
    fn pad(text: &str) -> String {
        text.split('\n')
            .map(|line| {
                let trimmed = line.trim_start();
                let indent = &line[..line.len() - trimmed.len()];
                match trimmed
                    .strip_prefix("* ")
                    .or_else(|| trimmed.strip_prefix("- "))
                {
                    Some(rest) => format!("{indent}-   {}", rest.trim_start()),
                    None => line.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    Ok(markdown_tidy_engine::FormatResult {
        formatted: pad(request.text),
        cursor_offset: request.cursor_offset.map(|offset| {
            let before: String = request.text.chars().take(offset).collect();
            pad(&before).chars().count()
        }),
    })
}
