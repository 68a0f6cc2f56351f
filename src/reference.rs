//! Shared documentation snippets (`option` entries) resolved into flat text.
//!
//! Options may embed other options through `config id="..."` children. Resolution
//! inlines those recursively, remembering which ids were already expanded for the
//! current top-level entry so that cyclic tables still terminate.

use crate::error::MarkupError;
use crate::markup::{self, Element};
use ahash::{AHashMap, AHashSet};
use std::borrow::Cow;

/// Tag of a reference to another option.
pub(crate) const REFERENCE_TAG: &str = "config";
const OPTION_TAG: &str = "option";

/// Placeholder text for a reference id that has no matching option.
pub fn unresolved(id: &str) -> String {
    format!("[UNRESOLVED:{}]", id)
}

/// Flat `id -> text` lookup built once per conversion run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: AHashMap<String, String>,
}

impl ReferenceTable {
    /// Build a table from already-resolved entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Resolved text for `id`, or the visible placeholder when it is missing.
    pub fn resolve(&self, id: &str) -> Cow<'_, str> {
        match self.get(id) {
            Some(text) => Cow::Borrowed(text),
            None => Cow::Owned(unresolved(id)),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the reference document and resolve every option in it.
pub fn resolve_all(source: &str) -> Result<ReferenceTable, MarkupError> {
    let root = markup::parse(source)?;
    Ok(resolve_document(&root))
}

/// Resolve every `option` child of an already-parsed reference document.
pub fn resolve_document(root: &Element) -> ReferenceTable {
    let mut options: AHashMap<&str, &Element> = AHashMap::new();
    for option in root.children_named(OPTION_TAG) {
        if let Some(id) = option.attr("id") {
            // First definition wins, matching document lookup order.
            options.entry(id).or_insert(option);
        }
    }

    let mut entries = AHashMap::with_capacity(options.len());
    for option in root.children_named(OPTION_TAG) {
        let Some(id) = option.attr("id") else {
            tracing::debug!("Skipping option without id");
            continue;
        };
        if entries.contains_key(id) {
            continue;
        }
        // The root counts as visited: a cycle back to it stops without
        // repeating the root's own text (A -> B -> A yields "alpha\nbeta").
        let mut visited = AHashSet::new();
        visited.insert(id);
        let text = resolve_option(option, &options, &mut visited);
        entries.insert(id.to_string(), text);
    }

    tracing::debug!("Resolved {} reference entries", entries.len());
    ReferenceTable { entries }
}

fn resolve_option<'a>(
    option: &'a Element,
    options: &AHashMap<&'a str, &'a Element>,
    visited: &mut AHashSet<&'a str>,
) -> String {
    let mut parts = Vec::new();

    for child in option.elements() {
        if child.is(REFERENCE_TAG) {
            let Some(ref_id) = child.attr("id") else {
                continue;
            };
            if !visited.insert(ref_id) {
                continue;
            }
            match options.get(ref_id).copied() {
                Some(target) => parts.push(resolve_option(target, options, visited)),
                None => {
                    tracing::warn!("Unresolved reference '{}'", ref_id);
                    parts.push(unresolved(ref_id));
                }
            }
        } else {
            parts.push(child.all_text().trim().to_string());
        }
    }

    parts.retain(|part| !part.is_empty());
    parts.join("\n")
}
