//! Reload the snapshot after a rebuild.

use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ReloadIndexRequest {}

/// Swap in a freshly read snapshot. The previous index stays active on failure.
pub async fn handle_reload_index(state: &DocState, _request: ReloadIndexRequest) -> Result<String, String> {
    let count = state
        .reload()
        .await
        .map_err(|e| format!("Failed to reload snapshot: {:#}", e))?;
    Ok(format!(
        "Reloaded {} records from {}",
        count,
        state.settings().snapshot.path.display()
    ))
}
