//! Indexing and retrieval for the PyTgCalls / NTgCalls documentation.
//!
//! The build pipeline resolves the shared reference table, normalizes every
//! page of the page map into a [`Record`] and writes a JSON snapshot. The
//! snapshot is then searched, rendered and served over MCP.

pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod markup;
pub mod reference;
pub mod search;
pub mod server;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod tools;
pub mod tracing;
pub mod types;

pub use build::{BuildReport, RecordBuilder};
pub use config::Settings;
pub use reference::ReferenceTable;
pub use search::{MarkupIndex, RankedSearch, RecordIndex};
pub use types::{Details, Example, Item, Kind, Library, Record, Section};
