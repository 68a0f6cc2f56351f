//! Keyword search and summaries straight from raw page markup.
//!
//! This path works on the unconverted page map, so it keeps answering even for
//! pages whose structure the extractor does not understand. Everything here is
//! pattern based; it never parses the markup into a tree.

use super::RankedSearch;
use crate::build::parse_page_map;
use crate::error::Result;
use crate::extract::dedent;
use crate::markup::collapse_whitespace;
use crate::source::read_source;
use crate::types::Item;
use anyhow::Context;
use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const MAX_SCORE: u32 = 100;
const PREVIEW_RADIUS: usize = 100;
const PREVIEW_FALLBACK: usize = 200;
const METHOD_PAGE_MARKERS: &[&str] = &["basic method", "stream method", "advanced method"];

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h1>(.*?)</h1>").unwrap());
static RE_METHOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<ref[^>]*>([^<]+)</ref>\s*\(([^)]*)\)").unwrap());
static RE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<ref[^>]*>([^<]+)</ref>\s*:\s*([^<,]+)").unwrap());
static RE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<syntax-highlight[^>]*>(.*?)</syntax-highlight>").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<category-title[^>]*>\s*<shi>class</shi>\s*<ref[^>]*>(.*?)<sb>(.*?)</sb>").unwrap()
});
static RE_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<category-title[^>]*>\s*<ref[^>]*>(.*?)<sb>(.*?)</sb></ref>\s*(\([^)]*\))?\s*(<shi>->\s*(.*?)</shi>)?",
    )
    .unwrap()
});
static RE_RETURN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<ref[^>]*>.*?</ref>\s*<shi>\s*->\s*(.*?)</shi>").unwrap());
static RE_FIRST_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<subtext>\s*<text>(.*?)</text>").unwrap());
static RE_ENUM_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<category-title>.*?<ref><sb>(.*?)</sb></ref>.*?<shi>=</shi>\s*(.*?)</category-title>.*?<subtext><text>(.*?)</text>",
    )
    .unwrap()
});
static RE_METHODS_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?si)<pg-title>METHODS</pg-title>(.*?)(?:<pg-title>|\z)").unwrap());
static RE_METHOD_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<category-title>(.*?)</category-title>\s*<subtext>\s*<text>(.*?)</text>").unwrap()
});
static RE_METHOD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<ref[^>]*>.*?<sb>(.*?)</sb>").unwrap());
static RE_METHOD_PARAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<sb>.*?</sb>\s*(\([^)]*\))").unwrap());
static RE_BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// One ranked page from the raw map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupHit {
    pub path: String,
    pub title: String,
    pub score: u32,
    pub preview: String,
}

/// A method listed on a class page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSummary {
    pub name: String,
    pub signature: String,
    pub return_type: String,
    pub description: String,
}

/// Pattern-derived summary of one raw page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOverview {
    pub path: String,
    pub title: String,
    pub class_info: String,
    pub description: String,
    pub return_type: String,
    pub examples: Vec<String>,
    pub enum_members: Vec<Item>,
    pub methods: Vec<MethodSummary>,
}

/// The raw page map, keyed by path without its leading `/`.
#[derive(Debug, Clone, Default)]
pub struct MarkupIndex {
    pages: BTreeMap<String, String>,
}

impl MarkupIndex {
    /// Load the page map from a file path or URL.
    pub fn load(source: &str) -> Result<Self> {
        let text = read_source(source).with_context(|| format!("Failed to load page map from {}", source))?;
        let index = Self::from_map(parse_page_map(&text)?);
        tracing::info!("Loaded {} raw pages for markup search", index.len());
        Ok(index)
    }

    pub fn from_map(map: BTreeMap<String, String>) -> Self {
        let pages = map
            .into_iter()
            .map(|(path, content)| (path.trim_start_matches('/').to_string(), content))
            .collect();
        Self { pages }
    }

    /// Raw markup of a page; the leading `/` is optional.
    pub fn page(&self, path: &str) -> Option<&str> {
        self.pages.get(path.trim().trim_start_matches('/')).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Summarize a page: class or method signature, return type, examples,
    /// enum members and listed methods.
    pub fn overview(&self, path: &str) -> Option<PageOverview> {
        let key = path.trim().trim_start_matches('/');
        let content = self.pages.get(key)?;

        let enum_members = if key.contains("Available Enums") {
            enum_members(content)
        } else {
            Vec::new()
        };

        Some(PageOverview {
            path: key.to_string(),
            title: extract_title(content).unwrap_or_else(|| key.to_string()),
            class_info: class_info(content),
            description: first_description(content),
            return_type: RE_RETURN
                .captures(content)
                .map(|caps| clean(&caps[1]))
                .unwrap_or_default(),
            examples: examples(content),
            enum_members,
            methods: methods(content),
        })
    }
}

impl RankedSearch for MarkupIndex {
    type Hit<'a> = MarkupHit;

    fn search<'a>(&'a self, query: &str, limit: usize) -> Vec<MarkupHit> {
        let query = query.trim().to_lowercase();
        let terms: Vec<&str> = query
            .split_whitespace()
            .filter(|term| term.chars().count() > 1)
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<MarkupHit> = self
            .pages
            .iter()
            .filter(|(path, _)| path.to_lowercase().ends_with(".xml"))
            .filter_map(|(path, content)| {
                let lower_path = path.to_lowercase();
                let is_method = METHOD_PAGE_MARKERS.iter().any(|m| lower_path.contains(m));
                let score = markup_score(content, &terms, is_method);
                (score > 0).then(|| MarkupHit {
                    path: path.clone(),
                    title: display_title(path, content),
                    score,
                    preview: preview(content, &terms),
                })
            })
            .collect();

        hits.sort_by(|a, b| Reverse(a.score).cmp(&Reverse(b.score)).then_with(|| a.path.cmp(&b.path)));
        hits.truncate(limit);
        hits
    }
}

/// Score one page against lower-cased query terms. Capped at 100.
pub(crate) fn markup_score(content: &str, terms: &[&str], is_method: bool) -> u32 {
    let phrase = terms.join(" ");
    let lower = content.to_lowercase();
    let title = extract_title(content).map(|t| t.to_lowercase());
    let mut score = 0;

    if let Some(title) = &title
        && title.contains(&phrase)
    {
        score += 100;
    }

    if let Some(caps) = RE_METHOD.captures(content) {
        let name = caps[1].to_lowercase();
        let params = caps[2].to_lowercase();
        if phrase == name {
            score += 95;
        } else if terms.iter().all(|t| name.contains(t)) {
            score += 80;
        } else if terms.iter().any(|t| params.contains(t)) {
            score += 60;
        }
    }

    for caps in RE_PARAM.captures_iter(content) {
        let name = caps[1].trim().to_lowercase();
        let type_name = caps[2].trim().to_lowercase();
        if phrase == name {
            score += 90;
        } else if terms.iter().all(|t| name.contains(t)) {
            score += 70;
        } else if type_name.contains(&phrase) {
            score += 60;
        }
    }

    if score == 0
        && let Some(title) = &title
    {
        if terms.iter().all(|t| title.contains(t)) {
            score = 50;
        } else if terms.iter().any(|t| title.contains(t)) {
            score = 30;
        }
    }

    if score == 0 {
        if terms.iter().all(|t| lower.contains(t)) {
            score = 40;
        } else if terms.iter().any(|t| lower.contains(t)) {
            score = 20;
        }
    }

    if is_method && score > 0 {
        score += 10;
    }

    if RE_CODE
        .captures_iter(content)
        .any(|caps| caps[1].to_lowercase().contains(&phrase))
    {
        score += 20;
    }

    score.min(MAX_SCORE)
}

fn extract_title(content: &str) -> Option<String> {
    RE_TITLE
        .captures(content)
        .map(|caps| caps[1].trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Title with a library tag, falling back to the file stem.
fn display_title(path: &str, content: &str) -> String {
    let title = extract_title(content).unwrap_or_else(|| {
        let file = path.rsplit('/').next().unwrap_or(path);
        file.rsplit_once('.').map_or(file, |(stem, _)| stem).to_string()
    });

    let lower = path.to_lowercase();
    if lower.contains("ntgcalls") {
        format!("[NTgCalls] {}", title)
    } else if lower.contains("pytgcalls") {
        format!("[PyTgCalls] {}", title)
    } else {
        title
    }
}

/// Plain-text window around the earliest term hit with terms wrapped in `**`.
pub(crate) fn preview(content: &str, terms: &[&str]) -> String {
    let text = collapse_whitespace(&RE_TAG.replace_all(content, " "));
    let matchers: Vec<Regex> = terms
        .iter()
        .filter_map(|term| {
            RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .collect();

    let Some(hit) = matchers
        .iter()
        .filter_map(|re| re.find(&text).map(|m| m.start()))
        .min()
    else {
        return if text.chars().count() > PREVIEW_FALLBACK {
            format!("{}...", take_chars(&text, PREVIEW_FALLBACK))
        } else {
            text
        };
    };

    let hit_char = text[..hit].chars().count();
    let total = text.chars().count();
    let start = hit_char.saturating_sub(PREVIEW_RADIUS);
    let end = (hit_char + PREVIEW_RADIUS).min(total);

    let mut window: String = text.chars().skip(start).take(end - start).collect();
    for re in &matchers {
        window = re.replace_all(&window, "**${0}**").into_owned();
    }

    let prefix = if start > 0 { "..." } else { "" };
    let suffix = if end < total { "..." } else { "" };
    format!("{}{}{}", prefix, window, suffix)
}

fn take_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Strip tags and collapse whitespace.
fn clean(fragment: &str) -> String {
    collapse_whitespace(&RE_TAG.replace_all(fragment, ""))
}

fn class_info(content: &str) -> String {
    if let Some(caps) = RE_CLASS.captures(content) {
        let namespace = clean(&caps[1]);
        let namespace = namespace.strip_suffix('.').unwrap_or(&namespace);
        let class_name = caps[2].trim();
        return match (namespace.is_empty(), class_name.is_empty()) {
            (false, false) => format!("{}.{}", namespace, class_name),
            (_, false) => class_name.to_string(),
            _ => namespace.to_string(),
        };
    }

    let Some(caps) = RE_SIGNATURE.captures(content) else {
        return String::new();
    };
    let namespace = clean(&caps[1]);
    let method_name = caps[2].trim();
    let params = caps.get(3).map_or("()", |m| m.as_str());
    let return_type = caps
        .get(5)
        .map(|m| format!(" -> {}", m.as_str().trim()))
        .unwrap_or_default();

    if namespace.is_empty() {
        format!("{}{}{}", method_name, params, return_type)
    } else if namespace.ends_with('.') {
        format!("{}{}{}{}", namespace, method_name, params, return_type)
    } else {
        format!("{}.{}{}{}", namespace, method_name, params, return_type)
    }
}

/// First line of the first `subtext > text` block.
fn first_description(content: &str) -> String {
    RE_FIRST_TEXT
        .captures(content)
        .and_then(|caps| {
            let text = caps[1].trim();
            let end = text.find(['<', '\n']).unwrap_or(text.len());
            let first = collapse_whitespace(&text[..end]);
            (!first.is_empty()).then_some(first)
        })
        .unwrap_or_default()
}

fn examples(content: &str) -> Vec<String> {
    RE_CODE
        .captures_iter(content)
        .map(|caps| {
            let code = html_escape::decode_html_entities(&caps[1]).into_owned();
            let code = dedent(&code);
            RE_BLANK_RUN.replace_all(&code, "\n\n").into_owned()
        })
        .filter(|code| !code.trim().is_empty())
        .collect()
}

fn enum_members(content: &str) -> Vec<Item> {
    RE_ENUM_MEMBER
        .captures_iter(content)
        .map(|caps| {
            let value = caps[2].trim();
            Item {
                name: caps[1].trim().to_string(),
                value: (!value.is_empty()).then(|| value.to_string()),
                description: clean(&caps[3]),
                ..Item::default()
            }
        })
        .collect()
}

fn methods(content: &str) -> Vec<MethodSummary> {
    let Some(section) = RE_METHODS_SECTION.captures(content) else {
        return Vec::new();
    };

    RE_METHOD_BLOCK
        .captures_iter(&section[1])
        .filter_map(|block| {
            let header = &block[1];
            let name = RE_METHOD_NAME.captures(header)?[1].trim().to_string();
            let signature = RE_METHOD_PARAMS
                .captures(header)
                .map_or_else(|| "()".to_string(), |caps| clean(&caps[1]));
            let return_type = header
                .split_once("->")
                .map(|(_, rest)| clean(rest))
                .unwrap_or_default();

            Some(MethodSummary {
                name,
                signature,
                return_type,
                description: collapse_whitespace(&RE_TAG.replace_all(&block[2], " ")),
            })
        })
        .collect()
}
