//! Rendering records and markup summaries for display.

mod html;
mod text;

use rmcp::schemars;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;

pub use html::{render, render_overview};
pub use text::{render_markup_hits, render_overview_text, render_text};

use crate::types::Record;

/// Largest message a chat transport accepts.
pub const MAX_MESSAGE_LEN: usize = 4096;
pub const TRUNCATION_NOTICE: &str =
    "...\n\n<i>Documentation was truncated due to length. View full documentation for complete details.</i>";

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)[^>]*>").unwrap());

/// Output flavor for rendered documentation.
///
/// DO NOT add doc comments to individual variants - this causes schemars to generate
/// `oneOf` schemas instead of simple `enum` arrays, breaking MCP client enum handling.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
}

/// Render a record in the requested format.
pub fn render_as(record: &Record, include_error_notes: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Html => render(record, include_error_notes),
        OutputFormat::Text => render_text(record, include_error_notes),
    }
}

/// Cut text that exceeds `limit` characters, appending the truncation notice.
///
/// The result (notice included) is at most `limit` characters. The cut never
/// lands inside a tag or an entity, and tags left open are closed before the
/// notice.
pub fn truncate_for_transport(text: &str, limit: usize) -> Cow<'_, str> {
    if text.chars().count() <= limit {
        return Cow::Borrowed(text);
    }

    let notice_len = TRUNCATION_NOTICE.chars().count();
    let mut budget = limit.saturating_sub(notice_len);
    loop {
        let prefix = markup_safe_prefix(text, budget);
        let closers = closing_tags(prefix);
        let total = prefix.chars().count() + closers.chars().count() + notice_len;
        if total <= limit || budget == 0 {
            return Cow::Owned(format!("{}{}{}", prefix, closers, TRUNCATION_NOTICE));
        }
        budget = budget.saturating_sub(total - limit);
    }
}

/// At most `max_chars` characters of `text`, backed off any partial tag or entity.
fn markup_safe_prefix(text: &str, max_chars: usize) -> &str {
    let cut = text.char_indices().nth(max_chars).map_or(text.len(), |(idx, _)| idx);
    let mut prefix = &text[..cut];

    if let Some(open) = prefix.rfind('<')
        && !prefix[open..].contains('>')
    {
        prefix = &prefix[..open];
    }
    if let Some(amp) = prefix.rfind('&') {
        let tail = &prefix[amp..];
        if !tail.contains(';') && !tail.contains(char::is_whitespace) {
            prefix = &prefix[..amp];
        }
    }
    prefix
}

/// Closing tags for every element still open at the end of `html`, innermost first.
fn closing_tags(html: &str) -> String {
    let mut open: Vec<&str> = Vec::new();
    for caps in RE_TAG.captures_iter(html) {
        let (Some(slash), Some(name)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if slash.as_str().is_empty() {
            open.push(name.as_str());
        } else if let Some(pos) = open.iter().rposition(|tag| *tag == name.as_str()) {
            open.truncate(pos);
        }
    }
    open.iter().rev().map(|tag| format!("</{}>", tag)).collect()
}
