//! Search over the raw page markup, bypassing the snapshot.

use crate::format::{render_markup_hits, render_overview_text, truncate_for_transport};
use crate::search::RankedSearch;
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchMarkupRequest {
    /// Keywords to look for in the raw page markup; one-letter words are ignored
    pub query: String,
    /// Maximum number of pages to return (default: configured search limit, usually 5)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Rank raw pages and summarize the best one.
pub async fn handle_search_markup(state: &DocState, request: SearchMarkupRequest) -> Result<String, String> {
    let markup = state
        .markup()
        .ok_or_else(|| "Markup search is disabled. Start the server with --markup to enable it.".to_string())?;

    let limit = request.limit.unwrap_or(state.settings().search.limit).max(1);
    let hits = markup.search(&request.query, limit);

    let mut out = render_markup_hits(&request.query, &hits);
    if let Some(overview) = hits.first().and_then(|hit| markup.overview(&hit.path)) {
        out.push_str("\nTop match overview:\n\n");
        out.push_str(&render_overview_text(&overview));
    }

    Ok(truncate_for_transport(&out, state.settings().search.max_message_len).into_owned())
}
