//! Shared test fixtures and utilities for integration tests.
//!
//! Each test gets its own temp directory holding a small page map, a reference
//! table and (once built) a snapshot, so tests can run in parallel.
//!
//! # Available Fixtures
//!
//! - `docs_workspace`: sources written, snapshot not yet built
//! - `built_workspace`: sources written and snapshot built

use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tgcalls_docs::build::{BuildReport, build_from_sources};
use tgcalls_docs::config::Settings;
use tgcalls_docs::state::DocState;

pub const PLAY_PATH: &str = "/PyTgCalls/Client/Stream Methods/play.xml";
pub const STREAM_MODE_PATH: &str = "/NTgCalls/Available Enums/StreamMode.xml";
pub const BROKEN_PATH: &str = "/PyTgCalls/broken.xml";

pub const CONFIG_XML: &str = r#"<options>
    <option id="CHAT_ID"><category-title>chat_id: int</category-title><config id="CHAT_ID_DESC"/></option>
    <option id="CHAT_ID_DESC"><subtext><text>Unique identifier of the target chat</text></subtext></option>
    <option id="WELCOME"><text>Welcome to PyTgCalls.</text></option>
</options>"#;

pub const PLAY_XML: &str = r#"<page>
    <h1>play</h1>
    <category-title>play(chat_id, stream=None)</category-title>
    <subtext><text>Play media in a group call.</text></subtext>
    <category>
        <pg-title>PARAMETERS</pg-title>
        <subtext><config id="CHAT_ID"/></subtext>
    </category>
    <category>
        <pg-title>RAISES</pg-title>
        <subtext>
            <category-title>NoActiveGroupCall</category-title>
            <text>No active group call</text>
            <category-title>NotInCallError</category-title>
            <text>The client is not in a call</text>
        </subtext>
    </category>
    <syntax-highlight language="python">
        await app.play(chat_id)
    </syntax-highlight>
</page>"#;

const PAUSE_XML: &str =
    "<page><h1>pause</h1><subtext><text>Pause the stream being played.</text></subtext></page>";

const STOP_XML: &str =
    "<page><h1>stop</h1><subtext><text>Stop what is playing and leave.</text></subtext></page>";

const STREAM_MODE_XML: &str = r#"<page>
    <h1>StreamMode</h1>
    <subtext><text>How a stream is sourced.</text></subtext>
    <subtext>
        <pg-title>ENUMERATION MEMBERS</pg-title>
        <subtext><category-title>CAPTURE = 0</category-title><text>Capture from a device</text></subtext>
        <subtext><category-title>PLAYBACK = 1</category-title><text>Play from a file</text></subtext>
    </subtext>
</page>"#;

const GETTING_STARTED_XML: &str =
    r#"<page><h1>Getting Started</h1><subtext><config id="WELCOME"/></subtext></page>"#;

/// The page map written to `map.json`.
pub fn page_map() -> serde_json::Value {
    serde_json::json!({
        PLAY_PATH: PLAY_XML,
        "/PyTgCalls/Client/Stream Methods/pause.xml": PAUSE_XML,
        "/PyTgCalls/Client/Stream Methods/stop.xml": STOP_XML,
        STREAM_MODE_PATH: STREAM_MODE_XML,
        "/PyTgCalls/Getting Started.xml": GETTING_STARTED_XML,
        BROKEN_PATH: "<page><h1>broken</page>",
    })
}

/// A temporary directory for test isolation, removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content, creating parent directories as needed.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A temp directory holding the documentation sources and settings pointing at them.
#[allow(dead_code)] // Fields used across different integration test crates
pub struct DocsWorkspace {
    workspace: TempWorkspace,
    pub settings: Settings,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl DocsWorkspace {
    pub fn new() -> Self {
        let workspace = TempWorkspace::new();
        let config = workspace.create_file("sources/config.xml", CONFIG_XML);
        let map = workspace.create_file("sources/map.json", &page_map().to_string());

        let mut settings = Settings::default();
        settings.sources.config = config.display().to_string();
        settings.sources.map = map.display().to_string();
        settings.snapshot.path = workspace.path().join("out/docs.json");

        Self { workspace, settings }
    }

    pub fn root(&self) -> &Path {
        self.workspace.path()
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.settings.snapshot.path
    }

    pub fn build(&self) -> BuildReport {
        build_from_sources(&self.settings).expect("Snapshot build failed")
    }

    /// Server state over the built snapshot, optionally with markup search.
    pub fn state(&self, markup: bool) -> DocState {
        let mut settings = self.settings.clone();
        settings.search.markup = markup;
        DocState::load(settings).expect("Failed to load snapshot")
    }
}

impl Default for DocsWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[fixture]
pub fn docs_workspace() -> DocsWorkspace {
    DocsWorkspace::new()
}

#[fixture]
pub fn built_workspace() -> DocsWorkspace {
    let docs = DocsWorkspace::new();
    docs.build();
    docs
}
