use super::RankedSearch;
use super::scoring::record_score;
use crate::error::SnapshotError;
use crate::snapshot;
use crate::types::Record;
use ahash::AHashMap;
use rapidfuzz::distance::jaro_winkler;
use std::cmp::Reverse;
use std::path::Path;

/// Minimum Jaro-Winkler similarity for a path suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Read-only, in-memory index over snapshot records.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    records: Vec<Record>,
    by_path: AHashMap<String, usize>,
}

/// A known path that resembles a path that was not found.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSuggestion {
    pub path: String,
    pub title: String,
    pub score: f64,
}

impl RecordIndex {
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let records = snapshot::load(path)?;
        tracing::info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self::from_records(records))
    }

    /// Index records, keeping their order as the final ranking tie-break.
    pub fn from_records(records: Vec<Record>) -> Self {
        let by_path = records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.path.clone(), idx))
            .collect();
        Self { records, by_path }
    }

    /// Look a record up by path; the leading `/` is optional.
    pub fn get(&self, path: &str) -> Option<&Record> {
        let path = path.trim();
        self.by_path
            .get(path)
            .or_else(|| self.by_path.get(&format!("/{}", path.trim_start_matches('/'))))
            .map(|&idx| &self.records[idx])
    }

    /// Paths or titles resembling `query`, most similar first.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<PathSuggestion> {
        let query = query.trim().to_lowercase();
        let mut suggestions: Vec<PathSuggestion> = self
            .records
            .iter()
            .map(|record| {
                let by_path = jaro_winkler::similarity(query.chars(), record.path.to_lowercase().chars());
                let by_title = jaro_winkler::similarity(query.chars(), record.title.to_lowercase().chars());
                PathSuggestion {
                    path: record.path.clone(),
                    title: record.title.clone(),
                    score: by_path.max(by_title),
                }
            })
            .filter(|suggestion| suggestion.score >= SUGGESTION_THRESHOLD)
            .collect();

        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.path.cmp(&b.path)));
        suggestions.truncate(limit);
        suggestions
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RankedSearch for RecordIndex {
    type Hit<'a> = &'a Record;

    /// Records ranked by score, then shorter title, then index order.
    fn search<'a>(&'a self, query: &str, limit: usize) -> Vec<&'a Record> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(u32, &Record)> = self
            .records
            .iter()
            .map(|record| (record_score(record, &query), record))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable sort keeps index order for full ties.
        scored.sort_by_key(|(score, record)| (Reverse(*score), record.title.chars().count()));
        tracing::debug!("Query '{}' matched {} records", query, scored.len());

        scored.into_iter().take(limit).map(|(_, record)| record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Details, Kind, Library};
    use assert2::{check, let_assert};

    fn record(path: &str, title: &str, description: &str) -> Record {
        Record {
            path: path.to_string(),
            title: title.to_string(),
            library: Library::PyTgCalls,
            kind: Kind::Method,
            description: description.to_string(),
            example: None,
            details: Details::default(),
            doc_url: String::new(),
        }
    }

    fn index() -> RecordIndex {
        RecordIndex::from_records(vec![
            record("/PyTgCalls/a.xml", "play_stream", " "),
            record("/PyTgCalls/b.xml", "play", " "),
            record("/PyTgCalls/c.xml", "pause", "Pause playback"),
            record("/PyTgCalls/d.xml", "stop", "Stop playing"),
        ])
    }

    #[test]
    fn shorter_title_wins_ties() {
        let index = index();
        let titles: Vec<&str> = index.search("play", 10).iter().map(|r| r.title.as_str()).collect();
        check!(titles == vec!["play", "play_stream", "stop", "pause"]);
    }

    #[test]
    fn full_ties_keep_index_order() {
        let index = RecordIndex::from_records(vec![
            record("/PyTgCalls/x.xml", "mute", " "),
            record("/PyTgCalls/y.xml", "mute", " "),
        ]);
        let paths: Vec<&str> = index.search("MUTE", 5).iter().map(|r| r.path.as_str()).collect();
        check!(paths == vec!["/PyTgCalls/x.xml", "/PyTgCalls/y.xml"]);
    }

    #[test]
    fn blank_query_returns_nothing() {
        let index = index();
        check!(index.search("", 5).is_empty());
        check!(index.search("   ", 5).is_empty());
    }

    #[test]
    fn limit_truncates() {
        check!(index().search("p", 2).len() == 2);
    }

    #[test]
    fn lookup_accepts_missing_leading_slash() {
        let index = index();
        let_assert!(Some(found) = index.get("PyTgCalls/b.xml"));
        check!(found.title == "play");
        check!(index.get("/PyTgCalls/zzz.xml").is_none());
    }

    #[test]
    fn suggestions_rank_similar_paths_first() {
        let index = index();
        let suggestions = index.suggest("/PyTgCalls/b.xm", 2);
        let_assert!(Some(first) = suggestions.first());
        check!(first.path == "/PyTgCalls/b.xml");
        check!(suggestions.len() <= 2);
    }
}
