//! Direct lookup of one record by its page path.

use crate::format::{OutputFormat, render_as, truncate_for_transport};
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Suggestions offered for an unknown path.
const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InspectDocRequest {
    /// Page path, e.g. "/PyTgCalls/Client/Stream Methods/play.xml" (leading slash optional)
    pub path: String,
    /// Include RAISES sections describing errors a method can raise
    #[serde(default)]
    pub include_errors: Option<bool>,
    /// Output format: html (chat markup) or text
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Render the record at `path`, or list similar paths when there is none.
pub async fn handle_inspect_doc(state: &DocState, request: InspectDocRequest) -> Result<String, String> {
    let index = state.records().await;

    if let Some(record) = index.get(&request.path) {
        let rendered = render_as(
            record,
            request.include_errors.unwrap_or(false),
            request.format.unwrap_or_default(),
        );
        return Ok(truncate_for_transport(&rendered, state.settings().search.max_message_len).into_owned());
    }

    let suggestions = index.suggest(&request.path, MAX_SUGGESTIONS);
    if suggestions.is_empty() {
        return Err(format!(
            "No documentation page at '{}'. Use search_docs to find pages by keyword.",
            request.path
        ));
    }

    let mut msg = format!("No documentation page at '{}'. Did you mean one of these?\n\n", request.path);
    for suggestion in suggestions {
        let _ = writeln!(msg, "• `{}` ({})", suggestion.path, suggestion.title);
    }
    Ok(msg)
}
