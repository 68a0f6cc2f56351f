//! Conversion of the raw page map into normalized records.

mod classify;

pub use classify::{classify, doc_url, library};

use crate::config::Settings;
use crate::error::Result;
use crate::extract::{PageExtract, PageExtractor};
use crate::markup::{self, Element, collapse_whitespace};
use crate::reference::{self, REFERENCE_TAG, ReferenceTable};
use crate::source::read_source;
use crate::types::{Details, Kind, Record};
use crate::{config, snapshot};
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Counts collected while building a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub records: usize,
    /// Paths of pages whose markup could not be parsed.
    pub skipped: Vec<String>,
    /// References to ids missing from the reference table.
    pub unresolved: usize,
    /// Where the snapshot was written, when it was.
    pub output: Option<PathBuf>,
}

/// Builds records from parsed pages against one reference table.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder<'a> {
    refs: &'a ReferenceTable,
    base_url: &'a str,
    default_language: &'a str,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(refs: &'a ReferenceTable) -> Self {
        Self {
            refs,
            base_url: config::DEFAULT_BASE_URL,
            default_language: crate::extract::DEFAULT_LANGUAGE,
        }
    }

    pub fn with_base_url(mut self, base_url: &'a str) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_default_language(mut self, language: &'a str) -> Self {
        self.default_language = language;
        self
    }

    /// Build every page of the map. Unparseable pages are skipped and reported.
    pub fn build<'m, I>(&self, pages: I) -> (BTreeMap<String, Record>, BuildReport)
    where
        I: IntoIterator<Item = (&'m String, &'m String)>,
    {
        let mut records = BTreeMap::new();
        let mut report = BuildReport::default();

        for (path, xml) in pages {
            let page = match markup::parse(xml) {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Skipping page {}: {}", path, e);
                    report.skipped.push(path.clone());
                    continue;
                }
            };
            report.unresolved += self.count_unresolved(&page);
            let record = self.build_page(path, &page);
            tracing::debug!("Built {} record for {}", record.kind, path);
            records.insert(path.clone(), record);
        }

        report.records = records.len();
        (records, report)
    }

    /// Normalize one parsed page.
    pub fn build_page(&self, path: &str, page: &Element) -> Record {
        let kind = classify(path);
        let (library, suffix) = library(path);
        let extract = PageExtractor::new(self.refs)
            .with_default_language(self.default_language)
            .extract(page);
        let description = self.description(page, kind, &extract);

        Record {
            path: path.to_string(),
            title: title(page),
            library,
            kind,
            description,
            example: extract.example,
            details: Details {
                signature: extract.signature,
                sections: extract.sections,
                members: extract.members,
                properties: extract.properties,
                parameters: extract.parameters,
            },
            doc_url: doc_url(self.base_url, library, suffix),
        }
    }

    fn description(&self, page: &Element, kind: Kind, extract: &PageExtract) -> String {
        let raw = if kind == Kind::Misc {
            self.flatten(page)
        } else {
            let referenced = page
                .child(REFERENCE_TAG)
                .and_then(|reference| reference.attr("id"))
                .and_then(|id| self.refs.get(id))
                .filter(|text| !text.trim().is_empty())
                .map(str::to_string);
            referenced
                .or_else(|| {
                    page.child("text")
                        .map(Element::all_text)
                        .filter(|text| !text.trim().is_empty())
                })
                .or_else(|| extract.fallback_description.clone())
                .unwrap_or_else(|| extract.description.clone())
        };

        let description = collapse_whitespace(&raw);
        if description.is_empty() {
            " ".to_string()
        } else {
            description
        }
    }

    /// Every reference and text node under the page, in document order.
    fn flatten(&self, page: &Element) -> String {
        page.descendants()
            .filter_map(|node| match node.tag.as_str() {
                REFERENCE_TAG => node.attr("id").map(|id| self.refs.resolve(id).into_owned()),
                "text" => Some(node.all_text().trim().to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn count_unresolved(&self, page: &Element) -> usize {
        page.descendants()
            .filter(|node| node.is(REFERENCE_TAG))
            .filter_map(|node| node.attr("id"))
            .filter(|id| !self.refs.contains(id))
            .count()
    }
}

/// Build records with the default base URL and example language.
pub fn build(
    raw_map: &BTreeMap<String, String>,
    refs: &ReferenceTable,
) -> (BTreeMap<String, Record>, BuildReport) {
    RecordBuilder::new(refs).build(raw_map)
}

/// Page title: leading text of `h1`, or all of its text when it starts with markup.
fn title(page: &Element) -> String {
    let Some(heading) = page.child("h1") else {
        return String::new();
    };
    let leading = heading.text();
    let leading = leading.trim();
    if leading.is_empty() {
        collapse_whitespace(&heading.all_text())
    } else {
        leading.to_string()
    }
}

/// Parse the page map JSON (`path -> page markup`).
pub fn parse_page_map(text: &str) -> Result<BTreeMap<String, String>> {
    let raw: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(text).context("Page map is not a JSON object")?;

    Ok(raw
        .into_iter()
        .filter_map(|(path, value)| match value {
            serde_json::Value::String(xml) => Some((path, xml)),
            _ => {
                tracing::warn!("Ignoring non-string page map entry {}", path);
                None
            }
        })
        .collect())
}

/// Load both sources, build every record and write the snapshot.
pub fn build_from_sources(settings: &Settings) -> Result<BuildReport> {
    let config_text = read_source(&settings.sources.config)
        .with_context(|| format!("Failed to load reference table from {}", settings.sources.config))?;
    let refs = reference::resolve_all(&config_text).context("Failed to parse reference table")?;
    tracing::info!("Resolved {} reference entries", refs.len());

    let map_text = read_source(&settings.sources.map)
        .with_context(|| format!("Failed to load page map from {}", settings.sources.map))?;
    let raw_map = parse_page_map(&map_text)?;
    tracing::info!("Loaded {} pages", raw_map.len());

    let (records, mut report) = RecordBuilder::new(&refs)
        .with_base_url(&settings.docs.base_url)
        .with_default_language(&settings.docs.default_language)
        .build(&raw_map);

    snapshot::write(&settings.snapshot.path, &records)?;
    report.output = Some(settings.snapshot.path.clone());

    tracing::info!(
        records = report.records,
        skipped = report.skipped.len(),
        unresolved = report.unresolved,
        "Snapshot written to {}",
        settings.snapshot.path.display()
    );
    Ok(report)
}
