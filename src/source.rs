//! Conversion inputs given as a local path or an http(s) URL.

use crate::error::SourceError;
use std::path::Path;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Read a source as UTF-8 text. Existing local files win over URL interpretation.
pub fn read_source(location: &str) -> Result<String, SourceError> {
    let path = Path::new(location);
    if path.is_file() {
        tracing::debug!("Reading source file {}", path.display());
        return std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        });
    }

    if is_url(location) {
        return fetch(location);
    }

    Err(SourceError::NotFound(location.to_string()))
}

pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn fetch(url: &str) -> Result<String, SourceError> {
    tracing::info!("Fetching {}", url);
    let fetch_error = |e: reqwest::Error| SourceError::Fetch {
        url: url.to_string(),
        error: e.to_string(),
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(fetch_error)?;

    let response = client.get(url).send().map_err(fetch_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(fetch_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.xml");
        std::fs::write(&path, "<options/>").unwrap();

        let_assert!(Ok(text) = read_source(&path.to_string_lossy()));
        check!(text == "<options/>");
    }

    #[test]
    fn missing_path_is_not_found() {
        let_assert!(Err(SourceError::NotFound(location)) = read_source("/definitely/not/here.json"));
        check!(location == "/definitely/not/here.json");
    }

    #[test]
    fn url_detection() {
        check!(is_url("https://raw.githubusercontent.com/pytgcalls/docsdata/master/map.json"));
        check!(is_url("http://localhost/map.json"));
        check!(!is_url("map.json"));
        check!(!is_url("httpdocs/map.json"));
    }
}
