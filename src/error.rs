//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for tgcalls-docs operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods at the pipeline entry points.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a conversion source (page map or reference table) cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Neither an existing local file nor an http(s) URL.
    #[error("Cannot read source '{0}': not a file or URL")]
    NotFound(String),
    /// The remote server answered with a non-success status.
    #[error("Fetching '{url}' failed with HTTP {status}")]
    Http { url: String, status: u16 },
    /// Transport-level failure while fetching a URL.
    #[error("Fetching '{url}' failed: {error}")]
    Fetch { url: String, error: String },
    /// Local read failure.
    #[error("Reading '{path}' failed: {error}")]
    Io { path: PathBuf, error: String },
}

/// Error returned when a markup fragment is not well-formed enough to build a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("Malformed markup at byte {position}: {message}")]
    Syntax { position: u64, message: String },
    #[error("Markup has no root element")]
    NoRoot,
    #[error("Markup ends with unclosed element <{0}>")]
    Unclosed(String),
}

/// Error returned when loading or writing the record snapshot fails.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Snapshot file not found at the expected path.
    #[error("Snapshot not found at {}", path.display())]
    NotFound { path: PathBuf },
    /// Failed to read or parse the snapshot file.
    #[error("Failed to load snapshot {}: {error}", path.display())]
    Parse { path: PathBuf, error: String },
    /// Failed to serialize or write the snapshot file.
    #[error("Failed to write snapshot {}: {error}", path.display())]
    Write { path: PathBuf, error: String },
}
