use super::fold::{Fragment, ItemFold, normalize_items, split_header};
use crate::markup::Element;
use crate::reference::{REFERENCE_TAG, ReferenceTable};
use crate::types::{Item, Section};

/// Which detail list a labeled page block feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockStyle {
    Parameters,
    Members,
    Properties,
}

impl BlockStyle {
    /// Match a `pg-title` label (case-insensitive substring).
    pub(crate) fn from_label(label: &str) -> Option<Self> {
        let label = label.to_uppercase();
        if label.contains("PARAMETERS") {
            Some(Self::Parameters)
        } else if label.contains("ENUMERATION MEMBERS") {
            Some(Self::Members)
        } else if label.contains("PROPERTIES") {
            Some(Self::Properties)
        } else {
            None
        }
    }

    fn item_from_title(self, title: &Element) -> Item {
        let raw = title.all_text();
        match self {
            Self::Parameters => {
                let (name, type_name) = split_header(&raw, ":");
                Item::named(name, type_name)
            }
            Self::Members => {
                let (name, value) = split_header(&raw, "=");
                Item {
                    value,
                    ..Item::named(name, None)
                }
            }
            Self::Properties => match raw.split_once("->") {
                Some(_) => {
                    let (name, type_name) = split_header(&raw, "->");
                    Item::named(name, type_name)
                }
                None => {
                    let type_name = title
                        .find("docs-ref")
                        .map(|docs_ref| docs_ref.all_text().trim().to_string())
                        .filter(|text| !text.is_empty());
                    let leading = title.text();
                    let name = match leading.trim() {
                        "" => raw.trim(),
                        name => name,
                    };
                    Item::named(name, type_name)
                }
            },
        }
    }
}

/// Items produced by one labeled block plus text that had no item to attach to.
#[derive(Debug, Default)]
pub(crate) struct BlockOutcome {
    pub(crate) items: Vec<Item>,
    pub(crate) orphans: Vec<String>,
}

/// Fold one inner `subtext` block of a labeled section.
///
/// The active item is scoped to this block: description text before the first
/// `category-title` belongs to the page, not to an item of a previous block.
pub(crate) fn fold_block(block: &Element, style: BlockStyle, refs: &ReferenceTable) -> BlockOutcome {
    let outcome = block
        .elements()
        .fold(ItemFold::default(), |fold, child| match child.tag.as_str() {
            "category-title" => fold.start(style.item_from_title(child)),
            "subtext" => fold.describe(&child.joined_text()),
            "text" => fold.describe(&child.all_text()),
            REFERENCE_TAG => match child.attr("id") {
                Some(id) => fold.describe(&refs.resolve(id)),
                None => fold,
            },
            _ => fold,
        })
        .finish();

    BlockOutcome {
        items: outcome.items,
        orphans: outcome.orphans,
    }
}

/// Direct `text` and `config` children of an unlabeled block, as description fragments.
pub(crate) fn loose_fragments(block: &Element, refs: &ReferenceTable) -> Vec<String> {
    block
        .elements()
        .filter_map(|child| match child.tag.as_str() {
            "text" => Some(child.all_text()),
            REFERENCE_TAG => child.attr("id").map(|id| refs.resolve(id).into_owned()),
            _ => None,
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Build a section from a `category` element. Returns the section (if it has
/// items) and any description text that preceded its first item.
pub(crate) fn category_section(
    category: &Element,
    refs: &ReferenceTable,
) -> (Option<Section>, Vec<String>) {
    let title = category
        .child("pg-title")
        .map(|t| t.all_text().trim().to_string())
        .unwrap_or_default();

    let fragments = category
        .children_named("subtext")
        .flat_map(|subtext| subtext.elements())
        .filter_map(|node| match node.tag.as_str() {
            REFERENCE_TAG => node.attr("id").map(|id| Fragment::Reference {
                id: id.to_string(),
                text: refs.resolve(id).into_owned(),
            }),
            "category-title" => Some(Fragment::Title(node.all_text())),
            "text" => Some(Fragment::Text(node.all_text())),
            _ => None,
        });

    let outcome = normalize_items(fragments);
    let section = (!outcome.items.is_empty()).then(|| Section {
        title,
        items: outcome.items,
    });
    (section, outcome.orphans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[rstest]
    #[case("PARAMETERS", Some(BlockStyle::Parameters))]
    #[case("Parameters", Some(BlockStyle::Parameters))]
    #[case("ENUMERATION MEMBERS", Some(BlockStyle::Members))]
    #[case("Properties", Some(BlockStyle::Properties))]
    #[case("RAISES", None)]
    fn label_matching(#[case] label: &str, #[case] expected: Option<BlockStyle>) {
        check!(BlockStyle::from_label(label) == expected);
    }

    #[test]
    fn parameter_block_attaches_text_to_active_item() {
        let xml = "<subtext>\
            <text>Shown before any parameter</text>\
            <category-title>chat_id: int</category-title>\
            <subtext><text>Unique identifier</text></subtext>\
            <config id=\"MORE\"/>\
            <category-title>stream</category-title>\
            <text>Media to play</text>\
        </subtext>";
        let_assert!(Ok(block) = parse(xml));
        let refs = ReferenceTable::from_entries([("MORE", "of the chat")]);

        let outcome = fold_block(&block, BlockStyle::Parameters, &refs);
        check!(outcome.orphans == vec!["Shown before any parameter".to_string()]);
        check!(outcome.items.len() == 2);
        check!(outcome.items[0].name == "chat_id");
        check!(outcome.items[0].type_name.as_deref() == Some("int"));
        check!(outcome.items[0].description == "Unique identifier of the chat");
        check!(outcome.items[1].name == "stream");
        check!(outcome.items[1].type_name.is_none());
        check!(outcome.items[1].description == "Media to play");
    }

    #[test]
    fn member_titles_carry_values() {
        let_assert!(Ok(block) = parse("<subtext><category-title>AUDIO = 1</category-title></subtext>"));
        let outcome = fold_block(&block, BlockStyle::Members, &ReferenceTable::default());
        let_assert!([member] = outcome.items.as_slice());
        check!(member.name == "AUDIO");
        check!(member.value.as_deref() == Some("1"));
        check!(member.type_name.is_none());
    }

    #[rstest]
    #[case("<category-title>volume -&gt; int</category-title>", "volume", Some("int"))]
    #[case("<category-title>chat <docs-ref>ChatInfo</docs-ref></category-title>", "chat", Some("ChatInfo"))]
    #[case("<category-title>plain</category-title>", "plain", None)]
    fn property_titles(#[case] title: &str, #[case] name: &str, #[case] type_name: Option<&str>) {
        let xml = format!("<subtext>{}</subtext>", title);
        let_assert!(Ok(block) = parse(&xml));
        let outcome = fold_block(&block, BlockStyle::Properties, &ReferenceTable::default());
        let_assert!([property] = outcome.items.as_slice());
        check!(property.name == name);
        check!(property.type_name.as_deref() == type_name);
    }

    #[test]
    fn category_builds_section_from_references() {
        let xml = "<category><pg-title>RAISES</pg-title>\
            <subtext><config id=\"NOT_IN_CALL\"/></subtext>\
            <subtext><text>when the client is idle</text></subtext>\
        </category>";
        let_assert!(Ok(category) = parse(xml));
        let refs = ReferenceTable::from_entries([("NOT_IN_CALL", "NotInCallError: exception\nRaised outside a call")]);

        let (section, orphans) = category_section(&category, &refs);
        let_assert!(Some(section) = section);
        check!(orphans.is_empty());
        check!(section.title == "RAISES");
        let_assert!([item] = section.items.as_slice());
        check!(item.name == "NotInCallError");
        check!(item.type_name.as_deref() == Some("exception"));
        check!(item.description == "Raised outside a call when the client is idle");
    }

    #[test]
    fn empty_category_is_dropped() {
        let_assert!(Ok(category) = parse("<category><pg-title>NOTES</pg-title><subtext/></category>"));
        let (section, orphans) = category_section(&category, &ReferenceTable::default());
        check!(section.is_none());
        check!(orphans.is_empty());
    }
}
