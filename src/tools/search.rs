//! Keyword search over the record snapshot.

use crate::format::{OutputFormat, render_as, truncate_for_transport};
use crate::search::RankedSearch;
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;

/// Separator between rendered records in one response.
pub const RECORD_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchDocsRequest {
    /// Keywords to look for (e.g. "play", "stream mode", "leave call")
    pub query: String,
    /// Maximum number of records to return (default: configured search limit, usually 5)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Include RAISES sections describing errors a method can raise
    #[serde(default)]
    pub include_errors: Option<bool>,
    /// Output format: html (chat markup) or text
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Rank records for the query and render the best ones.
pub async fn handle_search_docs(state: &DocState, request: SearchDocsRequest) -> Result<String, String> {
    let settings = state.settings();
    let limit = request.limit.unwrap_or(settings.search.limit).max(1);
    let include_errors = request.include_errors.unwrap_or(false);
    let format = request.format.unwrap_or_default();

    let index = state.records().await;
    let hits = index.search(&request.query, limit);
    tracing::debug!("search_docs '{}' -> {} hits", request.query, hits.len());

    if hits.is_empty() {
        return Ok(no_results_message(&request.query));
    }

    let rendered = hits
        .iter()
        .map(|record| render_as(record, include_errors, format))
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR);

    Ok(truncate_for_transport(&rendered, settings.search.max_message_len).into_owned())
}

fn no_results_message(query: &str) -> String {
    if query.trim().is_empty() {
        return "Empty query. Pass one or more keywords, e.g. 'play' or 'stream mode'.".to_string();
    }

    let mut msg = format!("No results found for '{}'.\n\n", query.trim());
    msg.push_str("Search tips:\n");
    msg.push_str("• Try a method or type name like 'play', 'leave_call', 'StreamMode'\n");
    msg.push_str("• Use fewer words; every word must appear together as a phrase\n");
    if query.contains('/') {
        msg.push_str("• Looking for a specific page? Use inspect_doc with its path\n");
    }
    msg
}
