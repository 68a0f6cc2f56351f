//! Relevance scoring for normalized records.
//!
//! A record earns fixed points for every field that contains the query as a
//! case-insensitive substring:
//! - 10: title
//! - 9: signature
//! - 7: library name
//! - 5: description
//! - 4 per section title, then per item 4 name / 3 type / 2 description
//! - members: 4 name / 3 value / 2 description
//! - properties and parameters: 4 name / 3 type / 2 description

use crate::types::{Item, Record};

/// Score a record against an already trimmed, lower-cased query.
pub fn record_score(record: &Record, query: &str) -> u32 {
    if query.is_empty() {
        return 0;
    }
    let hit = |field: &str, points: u32| if contains(field, query) { points } else { 0 };
    let details = &record.details;

    let mut score = hit(&record.title, 10)
        + details.signature.as_deref().map_or(0, |sig| hit(sig, 9))
        + hit(record.library.as_str(), 7)
        + hit(&record.description, 5);

    for section in &details.sections {
        score += hit(&section.title, 4);
        score += section.items.iter().map(|item| typed_item_score(item, query)).sum::<u32>();
    }

    score += details
        .members
        .iter()
        .map(|member| {
            hit(&member.name, 4)
                + member.value.as_deref().map_or(0, |value| hit(value, 3))
                + hit(&member.description, 2)
        })
        .sum::<u32>();

    score += details
        .properties
        .iter()
        .chain(&details.parameters)
        .map(|item| typed_item_score(item, query))
        .sum::<u32>();

    score
}

fn typed_item_score(item: &Item, query: &str) -> u32 {
    let mut score = 0;
    if contains(&item.name, query) {
        score += 4;
    }
    if item.type_name.as_deref().is_some_and(|t| contains(t, query)) {
        score += 3;
    }
    if contains(&item.description, query) {
        score += 2;
    }
    score
}

fn contains(field: &str, query: &str) -> bool {
    !field.is_empty() && field.to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Details, Kind, Library, Section};
    use assert2::check;
    use rstest::rstest;

    fn record(title: &str) -> Record {
        Record {
            path: format!("/PyTgCalls/{}.xml", title),
            title: title.to_string(),
            library: Library::PyTgCalls,
            kind: Kind::Method,
            description: " ".to_string(),
            example: None,
            details: Details::default(),
            doc_url: String::new(),
        }
    }

    #[rstest]
    #[case("play", 10)]
    #[case("pytgcalls", 7)]
    #[case("nothing", 0)]
    fn title_and_library_points(#[case] query: &str, #[case] expected: u32) {
        check!(record_score(&record("play"), query) == expected);
    }

    #[test]
    fn nested_fields_accumulate() {
        let mut rec = record("mute");
        rec.details.signature = Some("mute(chat_id: int)".to_string());
        rec.details.sections.push(Section {
            title: "PARAMETERS".to_string(),
            items: vec![Item {
                name: "chat_id".to_string(),
                type_name: Some("int".to_string()),
                description: "Unique chat_id".to_string(),
                ..Item::default()
            }],
        });
        rec.details.parameters.push(Item::named("chat_id", None));

        // signature 9 + item name 4 + item description 2 + parameter name 4
        check!(record_score(&rec, "chat_id") == 19);
    }

    #[test]
    fn members_score_values() {
        let mut rec = record("StreamMode");
        rec.details.members.push(Item {
            name: "CAPTURE".to_string(),
            value: Some("capture_mode".to_string()),
            ..Item::default()
        });
        check!(record_score(&rec, "capture") == 4 + 3);
    }

    #[test]
    fn adding_a_matching_field_never_lowers_the_score() {
        let mut rec = record("play");
        let before = record_score(&rec, "play");
        rec.description = "Play a stream".to_string();
        check!(record_score(&rec, "play") >= before);
    }
}
