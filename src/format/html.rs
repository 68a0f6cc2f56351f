//! Chat-style HTML: `<b>`, `<i>`, `<code>` and `<pre>` only, all text escaped.

use crate::search::PageOverview;
use crate::types::{Item, Record, Section};
use html_escape::encode_text;

/// Render a record. RAISES sections are left out unless `include_error_notes` is set.
pub fn render(record: &Record, include_error_notes: bool) -> String {
    let mut parts = vec![format!(
        "<b>{}</b> <i>({}, {})</i>",
        encode_text(&record.title),
        record.kind,
        record.library
    )];
    let details = &record.details;

    if let Some(signature) = details.signature.as_deref().filter(|s| !s.is_empty()) {
        parts.push(format!("<pre>{}</pre>", encode_text(signature)));
    }

    if !record.description.trim().is_empty() {
        parts.push(encode_text(&record.description).into_owned());
    }

    if let Some(example) = record.example.as_ref().filter(|e| !e.code.trim().is_empty()) {
        parts.push(format!(
            "<b>Example ({}):</b>\n<pre>{}</pre>",
            encode_text(&example.language),
            encode_text(example.code.trim())
        ));
    }

    for section in &details.sections {
        if section.is_raises() && !include_error_notes {
            continue;
        }
        render_section(&mut parts, section);
    }

    if !details.members.is_empty() {
        parts.push("<b>Members:</b>".to_string());
        parts.extend(details.members.iter().map(|m| bullet(m, " = ", true)));
    }

    if !details.properties.is_empty() {
        parts.push("<b>Properties:</b>".to_string());
        parts.extend(details.properties.iter().map(|p| bullet(p, " -> ", false)));
    }

    if !details.parameters.is_empty() {
        parts.push("<b>Parameters:</b>".to_string());
        parts.extend(details.parameters.iter().map(|p| bullet(p, ": ", false)));
    }

    parts.join("\n")
}

fn render_section(parts: &mut Vec<String>, section: &Section) {
    if !section.title.trim().is_empty() {
        parts.push(format!("<b>{}</b>", encode_text(&section.title)));
    }

    if section.is_raises() {
        for item in &section.items {
            let lines: Vec<&str> = item
                .description
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();
            // A named error leads its first line.
            let name = (!item.name.is_empty()).then(|| format!("<code>{}</code>", encode_text(&item.name)));
            match (name, lines.split_first()) {
                (Some(name), Some((first, rest))) => {
                    parts.push(format!("• {} — {}", name, encode_text(first)));
                    parts.extend(rest.iter().map(|line| format!("• {}", encode_text(line))));
                }
                (Some(name), None) => parts.push(format!("• {}", name)),
                (None, _) => parts.extend(lines.iter().map(|line| format!("• {}", encode_text(line)))),
            }
        }
        return;
    }

    parts.extend(section.items.iter().map(|item| bullet(item, ": ", false)));
}

/// `• <code>name</code>{sep}<i>type</i> — description`. Members show their value
/// in `<code>` instead of a type.
fn bullet(item: &Item, separator: &str, is_member: bool) -> String {
    let mut line = format!("• <code>{}</code>", encode_text(&item.name));

    let (detail, open, close) = if is_member {
        (item.value.as_deref(), "<code>", "</code>")
    } else {
        (item.type_name.as_deref(), "<i>", "</i>")
    };
    if let Some(detail) = detail.filter(|d| !d.is_empty()) {
        line.push_str(&format!("{}{}{}{}", separator, open, encode_text(detail), close));
    }

    let description = item.description.trim();
    if !description.is_empty() {
        line.push_str(&format!(" — {}", encode_text(description)));
    }
    line
}

/// Render a raw-markup page summary.
pub fn render_overview(overview: &PageOverview) -> String {
    let mut parts = vec![format!("<b>{}</b>", encode_text(&overview.title))];

    if !overview.class_info.is_empty() {
        parts.push(format!("<code>{}</code>", encode_text(&overview.class_info)));
    }
    if !overview.description.is_empty() {
        parts.push(encode_text(&overview.description).into_owned());
    }
    if !overview.return_type.is_empty() {
        parts.push(format!("<b>Returns:</b> <i>{}</i>", encode_text(&overview.return_type)));
    }

    if !overview.enum_members.is_empty() {
        parts.push("<b>Members:</b>".to_string());
        parts.extend(overview.enum_members.iter().map(|m| bullet(m, " = ", true)));
    }

    if !overview.methods.is_empty() {
        parts.push("<b>Methods:</b>".to_string());
        for method in &overview.methods {
            let mut line = format!(
                "• <code>{}{}</code>",
                encode_text(&method.name),
                encode_text(&method.signature)
            );
            if !method.return_type.is_empty() {
                line.push_str(&format!(" -> <i>{}</i>", encode_text(&method.return_type)));
            }
            if !method.description.is_empty() {
                line.push_str(&format!(" — {}", encode_text(&method.description)));
            }
            parts.push(line);
        }
    }

    if let Some(example) = overview.examples.first() {
        parts.push(format!("<b>Example:</b>\n<pre>{}</pre>", encode_text(example)));
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MethodSummary;
    use crate::types::{Details, Example, Kind, Library};
    use assert2::check;

    fn play() -> Record {
        Record {
            path: "/PyTgCalls/Client/Stream Methods/play.xml".to_string(),
            title: "play".to_string(),
            library: Library::PyTgCalls,
            kind: Kind::Method,
            description: "Play <media> & more".to_string(),
            example: Some(Example {
                language: "python".to_string(),
                code: "await app.play(chat_id)".to_string(),
            }),
            details: Details {
                signature: Some("play(chat_id: int)".to_string()),
                sections: vec![
                    Section {
                        title: "PARAMETERS".to_string(),
                        items: vec![Item {
                            name: "chat_id".to_string(),
                            type_name: Some("int".to_string()),
                            description: "Unique identifier".to_string(),
                            ..Item::default()
                        }],
                    },
                    Section {
                        title: "Raises".to_string(),
                        items: vec![Item {
                            name: "NoActiveGroupCall".to_string(),
                            description: "No call\nis running".to_string(),
                            ..Item::default()
                        }],
                    },
                ],
                ..Details::default()
            },
            doc_url: String::new(),
        }
    }

    #[test]
    fn renders_in_order_with_escaping() {
        let html = render(&play(), false);
        let lines: Vec<&str> = html.lines().collect();
        check!(lines[0] == "<b>play</b> <i>(method, PyTgCalls)</i>");
        check!(lines[1] == "<pre>play(chat_id: int)</pre>");
        check!(lines[2] == "Play &lt;media&gt; &amp; more");
        check!(lines[3] == "<b>Example (python):</b>");
        check!(lines[4] == "<pre>await app.play(chat_id)</pre>");
        check!(lines[5] == "<b>PARAMETERS</b>");
        check!(lines[6] == "• <code>chat_id</code>: <i>int</i> — Unique identifier");
        check!(!html.contains("NoActiveGroupCall"));
    }

    #[test]
    fn raises_render_one_bullet_per_line_when_requested() {
        let html = render(&play(), true);
        check!(html.contains("<b>Raises</b>\n• <code>NoActiveGroupCall</code> — No call\n• is running"));
        check!(html.matches("• ").count() == 3);
    }

    #[test]
    fn untitled_sections_render_without_a_header() {
        let mut record = play();
        record.details.sections = vec![Section {
            title: String::new(),
            items: vec![Item::named("a", Some("int".to_string()))],
        }];
        let html = render(&record, false);
        check!(!html.contains("<b></b>"));
        check!(html.ends_with("</pre>\n• <code>a</code>: <i>int</i>"));
    }

    #[test]
    fn members_show_values() {
        let mut record = play();
        record.details.sections.clear();
        record.details.members.push(Item {
            name: "AUDIO".to_string(),
            value: Some("1".to_string()),
            description: "Audio only".to_string(),
            ..Item::default()
        });
        check!(render(&record, false).ends_with("<b>Members:</b>\n• <code>AUDIO</code> = <code>1</code> — Audio only"));
    }

    #[test]
    fn overview_lists_methods() {
        let overview = PageOverview {
            title: "StreamMode".to_string(),
            class_info: "ntgcalls.StreamMode".to_string(),
            methods: vec![MethodSummary {
                name: "describe".to_string(),
                signature: "(verbose)".to_string(),
                return_type: "str".to_string(),
                description: "Describe".to_string(),
            }],
            ..PageOverview::default()
        };
        let html = render_overview(&overview);
        check!(html.contains("<code>ntgcalls.StreamMode</code>"));
        check!(html.contains("• <code>describe(verbose)</code> -> <i>str</i> — Describe"));
    }
}
