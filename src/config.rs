//! Layered settings: built-in defaults, then a TOML file, then environment, then CLI flags.

use crate::error::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAP_SOURCE: &str =
    "https://raw.githubusercontent.com/pytgcalls/docsdata/master/map.json";
pub const DEFAULT_CONFIG_SOURCE: &str =
    "https://raw.githubusercontent.com/pytgcalls/docsdata/master/config.xml";
pub const DEFAULT_BASE_URL: &str = "https://pytgcalls.github.io";

/// Settings file looked up in the working directory.
pub const LOCAL_SETTINGS_FILE: &str = "tgcalls-docs.toml";

pub const ENV_MAP: &str = "TGCALLS_DOCS_MAP";
pub const ENV_CONFIG: &str = "TGCALLS_DOCS_CONFIG";
pub const ENV_SNAPSHOT: &str = "TGCALLS_DOCS_SNAPSHOT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sources: SourceSettings,
    pub snapshot: SnapshotSettings,
    pub docs: DocsSettings,
    pub search: SearchSettings,
}

/// Where the raw page map and reference table come from (path or http(s) URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub map: String,
    pub config: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            map: DEFAULT_MAP_SOURCE.to_string(),
            config: DEFAULT_CONFIG_SOURCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    pub path: PathBuf,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("docs.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsSettings {
    /// Site root the documentation URLs are derived from.
    pub base_url: String,
    /// Language assumed for code examples without one.
    pub default_language: String,
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_language: crate::extract::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub limit: usize,
    /// Upper bound for one rendered message before it is truncated.
    pub max_message_len: usize,
    /// Also keep the raw page map loaded for markup search.
    pub markup: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            limit: 5,
            max_message_len: crate::format::MAX_MESSAGE_LEN,
            markup: false,
        }
    }
}

impl Settings {
    /// Load settings from the first settings file found (explicit path, then the
    /// working directory, then the user config dir) and apply the environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = match settings_file(explicit)? {
            Some(path) => {
                tracing::debug!("Loading settings from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let mut settings: Self = toml::from_str(text)?;
        settings.expand_paths();
        Ok(settings)
    }

    /// Override sources and snapshot path from environment variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(map) = var(ENV_MAP) {
            self.sources.map = map;
        }
        if let Some(config) = var(ENV_CONFIG) {
            self.sources.config = config;
        }
        if let Some(snapshot) = var(ENV_SNAPSHOT) {
            self.snapshot.path = PathBuf::from(snapshot);
        }
        self.expand_paths();
    }

    fn expand_paths(&mut self) {
        self.sources.map = expand_tilde(&self.sources.map).into_owned();
        self.sources.config = expand_tilde(&self.sources.config).into_owned();
        if let Some(path) = self.snapshot.path.to_str() {
            self.snapshot.path = PathBuf::from(expand_tilde(path).as_ref());
        }
    }
}

fn settings_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        let path = PathBuf::from(expand_tilde(&path.to_string_lossy()).as_ref());
        anyhow::ensure!(path.is_file(), "Settings file {} does not exist", path.display());
        return Ok(Some(path));
    }

    let local = PathBuf::from(LOCAL_SETTINGS_FILE);
    if local.is_file() {
        return Ok(Some(local));
    }

    Ok(dirs::config_dir()
        .map(|dir| dir.join("tgcalls-docs").join("config.toml"))
        .filter(|path| path.is_file()))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths (and URLs) are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
