use crate::types::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub const EMPTY_EXTRACTION: &str = "[Could not extract main content]";

const MAX_STEM_CHARS: usize = 100;

/// File name for a fetched URL: scheme dropped, separators replaced, at most
/// 100 safe characters, `.md` appended.
pub fn sanitize_filename(url: &str) -> String {
    let name = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let name = name
        .replace('/', "_")
        .replace(':', "-")
        .replace(['?', '=', '&'], "");
    let name = name.trim_matches(|c: char| matches!(c, '.' | '_' | '-' | ' '));

    let stem: String = name
        .chars()
        .take(MAX_STEM_CHARS)
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    if stem.is_empty() {
        "default_page.md".to_string()
    } else {
        format!("{}.md", stem)
    }
}

pub fn render_markdown(url: &str, text: &str, fetched_at: &DateTime<Local>) -> String {
    let body = if text.is_empty() { EMPTY_EXTRACTION } else { text };
    format!(
        "# Content from: {url}\n\nSource URL: `{url}`\nFetched on: {}\n\n---\n\n{body}\n",
        // numeric offset; chrono has no zone abbreviation for `Local`
        fetched_at.format("%Y-%m-%d %H:%M:%S %z"),
    )
}

/// Write the page to `{output_dir}/{YYYY-MM-DD}/{sanitized name}`
pub fn save_markdown(
    output_dir: &Path,
    url: &str,
    text: &str,
    fetched_at: &DateTime<Local>,
) -> Result<PathBuf> {
    let dir = output_dir.join(fetched_at.format("%Y-%m-%d").to_string());
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(sanitize_filename(url));
    if text.is_empty() {
        tracing::warn!("Extracted text was empty for {}. Saving minimal info.", url);
    }
    std::fs::write(&path, render_markdown(url, text, fetched_at))?;
    tracing::info!("Saved extracted text for {} to {}", url, path.display());
    Ok(path)
}
