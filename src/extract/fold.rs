//! Item accumulation shared by labeled blocks and category sections.
//!
//! Markup supplies items as a flat run of sibling nodes: a header node names an
//! item and the nodes after it describe it. The fold carries the most recent item
//! as its accumulator; description text arriving before any header has no item to
//! attach to and is handed back as a page-level description fragment.

use crate::types::Item;

/// One child node of a block, already reduced to the text it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Header text such as `chat_id: int`, `NAME = 1` or `volume -> int`.
    Title(String),
    /// Expanded reference: first line may carry a `name: type` header.
    Reference { id: String, text: String },
    /// Bare description text.
    Text(String),
}

/// Result of folding one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldOutcome {
    pub items: Vec<Item>,
    /// Description text that arrived before the block produced any item.
    pub orphans: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct ItemFold {
    items: Vec<Item>,
    orphans: Vec<String>,
}

impl ItemFold {
    /// Begin a new item; later description fragments attach to it.
    pub(crate) fn start(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Attach description text to the active item, or keep it as an orphan.
    pub(crate) fn describe(mut self, text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return self;
        }
        match self.items.last_mut() {
            Some(item) => item.append_description(text),
            None => self.orphans.push(text.to_string()),
        }
        self
    }

    /// Expanded reference text: a `name: type` first line starts a new item, anything
    /// else continues the active item or seeds an unnamed one tracing back to `id`.
    pub(crate) fn reference(mut self, id: &str, text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return self;
        }
        let (first_line, rest) = match text.split_once('\n') {
            Some((first, rest)) => (first, rest.trim()),
            None => (text, ""),
        };

        if let Some((name, type_name)) = first_line.split_once(':') {
            self.items.push(Item {
                name: name.trim().to_string(),
                type_name: non_empty(type_name),
                description: rest.to_string(),
                source_config: Some(id.to_string()),
                value: None,
            });
        } else if let Some(item) = self.items.last_mut() {
            item.append_description(text);
        } else {
            self.items.push(Item {
                description: text.to_string(),
                source_config: Some(id.to_string()),
                ..Item::default()
            });
        }
        self
    }

    pub(crate) fn finish(self) -> FoldOutcome {
        FoldOutcome {
            items: self.items,
            orphans: self.orphans,
        }
    }
}

/// Fold a category section's fragments into items (`name: type` headers).
pub fn normalize_items<I>(fragments: I) -> FoldOutcome
where
    I: IntoIterator<Item = Fragment>,
{
    fragments
        .into_iter()
        .fold(ItemFold::default(), |fold, fragment| match fragment {
            Fragment::Title(raw) => {
                let (name, type_name) = split_header(&raw, ":");
                fold.start(Item::named(name, type_name))
            }
            Fragment::Reference { id, text } => fold.reference(&id, &text),
            Fragment::Text(text) => fold.describe(&text),
        })
        .finish()
}

/// Split `name <sep> rest` into a trimmed name and an optional trimmed remainder.
pub(crate) fn split_header(raw: &str, separator: &str) -> (String, Option<String>) {
    match raw.split_once(separator) {
        Some((name, rest)) => (name.trim().to_string(), non_empty(rest)),
        None => (raw.trim().to_string(), None),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn title(raw: &str) -> Fragment {
        Fragment::Title(raw.to_string())
    }

    fn text(raw: &str) -> Fragment {
        Fragment::Text(raw.to_string())
    }

    fn reference(id: &str, raw: &str) -> Fragment {
        Fragment::Reference {
            id: id.to_string(),
            text: raw.to_string(),
        }
    }

    #[test]
    fn bare_fragment_continues_previous_item() {
        let outcome = normalize_items([title("x"), text("A"), text("B")]);
        check!(outcome.items.len() == 1);
        check!(outcome.items[0].name == "x");
        check!(outcome.items[0].description == "A B");
        check!(outcome.orphans.is_empty());
    }

    #[test]
    fn fragment_before_any_item_becomes_page_description() {
        let outcome = normalize_items([text("intro"), title("x: int")]);
        check!(outcome.orphans == vec!["intro".to_string()]);
        check!(outcome.items.len() == 1);
        check!(outcome.items[0].description.is_empty());
    }

    #[test]
    fn reference_header_starts_typed_item() {
        let outcome = normalize_items([reference(
            "CHAT_ID",
            "chat_id: int\nUnique identifier of the chat",
        )]);
        check!(outcome.items.len() == 1);
        let item = &outcome.items[0];
        check!(item.name == "chat_id");
        check!(item.type_name.as_deref() == Some("int"));
        check!(item.description == "Unique identifier of the chat");
        check!(item.source_config.as_deref() == Some("CHAT_ID"));
    }

    #[test]
    fn headerless_reference_seeds_unnamed_item_then_continues() {
        let outcome = normalize_items([
            reference("ERR_A", "Raised when not connected"),
            reference("ERR_B", "Raised when muted"),
        ]);
        check!(outcome.items.len() == 1);
        check!(outcome.items[0].name.is_empty());
        check!(outcome.items[0].description == "Raised when not connected Raised when muted");
        check!(outcome.items[0].source_config.as_deref() == Some("ERR_A"));
    }

    #[rstest]
    #[case("chat_id: int", "chat_id", Some("int"))]
    #[case("chat_id", "chat_id", None)]
    #[case("stream:", "stream", None)]
    #[case(" audio : Optional[AudioParameters] ", "audio", Some("Optional[AudioParameters]"))]
    fn header_split(#[case] raw: &str, #[case] name: &str, #[case] type_name: Option<&str>) {
        let (got_name, got_type) = split_header(raw, ":");
        check!(got_name == name);
        check!(got_type.as_deref() == type_name);
    }
}
