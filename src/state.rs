//! Shared state for the MCP server.
//!
//! Queries clone the current `Arc<RecordIndex>` and run without holding the
//! lock; a reload builds the replacement off the async runtime and swaps it in.

use crate::config::Settings;
use crate::error::Result;
use crate::search::{MarkupIndex, RecordIndex};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct DocState {
    /// Loaded snapshot records
    records: RwLock<Arc<RecordIndex>>,

    /// Raw page map for markup search (only when enabled)
    markup: Option<Arc<MarkupIndex>>,

    settings: Settings,
}

impl std::fmt::Debug for DocState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocState")
            .field("snapshot", &self.settings.snapshot.path)
            .field("has_markup", &self.markup.is_some())
            .finish()
    }
}

impl DocState {
    pub fn new(settings: Settings, records: RecordIndex, markup: Option<MarkupIndex>) -> Self {
        Self {
            records: RwLock::new(Arc::new(records)),
            markup: markup.map(Arc::new),
            settings,
        }
    }

    /// Load the snapshot (and the page map, when markup search is enabled).
    pub fn load(settings: Settings) -> Result<Self> {
        let records = RecordIndex::load(&settings.snapshot.path)
            .context("Run `tgcalls-docs build` to create the snapshot first")?;
        let markup = if settings.search.markup {
            Some(MarkupIndex::load(&settings.sources.map)?)
        } else {
            None
        };
        Ok(Self::new(settings, records, markup))
    }

    /// Current record index.
    pub async fn records(&self) -> Arc<RecordIndex> {
        self.records.read().await.clone()
    }

    pub fn markup(&self) -> Option<&Arc<MarkupIndex>> {
        self.markup.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Re-read the snapshot from disk and swap it in. Returns the new record count.
    pub async fn reload(&self) -> Result<usize> {
        let path = self.settings.snapshot.path.clone();
        let index = tokio::task::spawn_blocking(move || RecordIndex::load(&path))
            .await
            .context("Snapshot reload task failed")??;

        let count = index.len();
        *self.records.write().await = Arc::new(index);
        tracing::info!("Reloaded {} records", count);
        Ok(count)
    }
}
