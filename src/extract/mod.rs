//! Page extraction: pull the structured parts out of one parsed page.
//!
//! Extraction never fails. Missing substructure produces empty fields and the
//! caller decides which description source wins.

mod blocks;
mod example;
mod fold;

pub use example::dedent;
pub use fold::{FoldOutcome, Fragment, normalize_items};

use crate::markup::{Element, collapse_whitespace};
use crate::reference::{REFERENCE_TAG, ReferenceTable};
use crate::types::{Example, Item, Section};
use blocks::BlockStyle;

/// Language assumed for code blocks without a `language` attribute.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Everything the extractor pulls out of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtract {
    pub signature: Option<String>,
    /// Page-level description assembled from unlabeled blocks and orphaned text.
    pub description: String,
    pub sections: Vec<Section>,
    pub members: Vec<Item>,
    pub properties: Vec<Item>,
    pub parameters: Vec<Item>,
    pub example: Option<Example>,
    pub fallback_description: Option<String>,
}

/// Extracts pages against one reference table.
#[derive(Debug, Clone, Copy)]
pub struct PageExtractor<'a> {
    refs: &'a ReferenceTable,
    default_language: &'a str,
}

impl<'a> PageExtractor<'a> {
    pub fn new(refs: &'a ReferenceTable) -> Self {
        Self {
            refs,
            default_language: DEFAULT_LANGUAGE,
        }
    }

    pub fn with_default_language(mut self, language: &'a str) -> Self {
        self.default_language = language;
        self
    }

    pub fn extract(&self, page: &Element) -> PageExtract {
        let mut description: Vec<String> = Vec::new();
        let mut extract = PageExtract {
            signature: signature(page),
            example: example::extract_example(page, self.default_language),
            fallback_description: fallback_description(page, self.refs),
            ..PageExtract::default()
        };

        for block in page.children_named("subtext") {
            let style = block
                .child("pg-title")
                .and_then(|label| BlockStyle::from_label(&label.all_text()));

            let Some(style) = style else {
                description.extend(blocks::loose_fragments(block, self.refs));
                continue;
            };

            for inner in block.children_named("subtext") {
                let outcome = blocks::fold_block(inner, style, self.refs);
                let target = match style {
                    BlockStyle::Parameters => &mut extract.parameters,
                    BlockStyle::Members => &mut extract.members,
                    BlockStyle::Properties => &mut extract.properties,
                };
                target.extend(outcome.items);
                description.extend(outcome.orphans);
            }
        }

        for category in page.descendants().filter(|el| el.is("category")) {
            let (section, orphans) = blocks::category_section(category, self.refs);
            description.extend(orphans);
            extract.sections.extend(section);
        }

        extract.description = collapse_whitespace(&description.join(" "));
        tracing::trace!(
            sections = extract.sections.len(),
            parameters = extract.parameters.len(),
            members = extract.members.len(),
            properties = extract.properties.len(),
            "Extracted page"
        );
        extract
    }
}

/// Extract a page using the default example language.
pub fn extract(page: &Element, refs: &ReferenceTable) -> PageExtract {
    PageExtractor::new(refs).extract(page)
}

fn signature(page: &Element) -> Option<String> {
    page.child("category-title")
        .map(|title| title.all_text().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// First top-level block that yields a reference (preferred) or non-empty text.
fn fallback_description(page: &Element, refs: &ReferenceTable) -> Option<String> {
    page.children_named("subtext").find_map(|block| {
        let referenced = block
            .children_named(REFERENCE_TAG)
            .filter_map(|reference| reference.attr("id"))
            .map(|id| refs.resolve(id).trim().to_string())
            .find(|text| !text.is_empty());

        referenced.or_else(|| {
            block
                .children_named("text")
                .map(|text| text.all_text().trim().to_string())
                .find(|text| !text.is_empty())
        })
    })
}
