//! Plain-text rendering for terminals and the MCP tool responses.

use crate::search::{MarkupHit, PageOverview};
use crate::types::{Item, Record};
use std::fmt::{self, Write as _};

/// Render a record as indented plain text.
pub fn render_text(record: &Record, include_error_notes: bool) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_record(&mut out, record, include_error_notes);
    out
}

fn write_record(out: &mut String, record: &Record, include_error_notes: bool) -> fmt::Result {
    writeln!(out, "{} ({}, {})", record.title, record.kind, record.library)?;
    let details = &record.details;

    if let Some(signature) = details.signature.as_deref().filter(|s| !s.is_empty()) {
        writeln!(out, "  {}", signature)?;
    }
    if !record.description.trim().is_empty() {
        writeln!(out, "\n{}", record.description)?;
    }

    if let Some(example) = record.example.as_ref().filter(|e| !e.code.trim().is_empty()) {
        writeln!(out, "\nExample ({}):", example.language)?;
        for line in example.code.lines() {
            writeln!(out, "    {}", line)?;
        }
    }

    for section in &details.sections {
        if section.is_raises() && !include_error_notes {
            continue;
        }
        if section.title.trim().is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "\n{}", section.title)?;
        }
        for item in &section.items {
            if section.is_raises() {
                let mut lines = item.description.lines().map(str::trim).filter(|l| !l.is_empty());
                if !item.name.is_empty() {
                    match lines.next() {
                        Some(first) => writeln!(out, "  - {}: {}", item.name, first)?,
                        None => writeln!(out, "  - {}", item.name)?,
                    }
                }
                for line in lines {
                    writeln!(out, "  - {}", line)?;
                }
            } else {
                write_item(out, item, ": ", item.type_name.as_deref())?;
            }
        }
    }

    let lists: [(&str, &[Item], &str, bool); 3] = [
        ("Members", details.members.as_slice(), " = ", true),
        ("Properties", details.properties.as_slice(), " -> ", false),
        ("Parameters", details.parameters.as_slice(), ": ", false),
    ];
    for (heading, items, separator, is_member) in lists {
        if items.is_empty() {
            continue;
        }
        writeln!(out, "\n{}:", heading)?;
        for item in items {
            let detail = if is_member {
                item.value.as_deref()
            } else {
                item.type_name.as_deref()
            };
            write_item(out, item, separator, detail)?;
        }
    }

    if !record.doc_url.is_empty() {
        writeln!(out, "\nDoc URL: {}", record.doc_url)?;
    }
    Ok(())
}

fn write_item(out: &mut String, item: &Item, separator: &str, detail: Option<&str>) -> fmt::Result {
    let name = if item.name.is_empty() { "-" } else { &item.name };
    write!(out, "  {}", name)?;
    if let Some(detail) = detail.filter(|d| !d.is_empty()) {
        write!(out, "{}{}", separator, detail)?;
    }
    let description = item.description.trim();
    if !description.is_empty() {
        write!(out, "  # {}", description)?;
    }
    writeln!(out)
}

/// Numbered list of markup search hits with their previews.
pub fn render_markup_hits(query: &str, hits: &[MarkupHit]) -> String {
    let mut out = String::new();
    let _ = write_hits(&mut out, query, hits);
    out
}

fn write_hits(out: &mut String, query: &str, hits: &[MarkupHit]) -> fmt::Result {
    if hits.is_empty() {
        return writeln!(out, "No pages match '{}'.", query);
    }
    writeln!(out, "Pages matching '{}':\n", query)?;
    for (idx, hit) in hits.iter().enumerate() {
        writeln!(out, "{}. {} - score {}", idx + 1, hit.title, hit.score)?;
        writeln!(out, "   {}", hit.path)?;
        if !hit.preview.is_empty() {
            writeln!(out, "   {}", hit.preview)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Plain-text form of a raw-markup page summary.
pub fn render_overview_text(overview: &PageOverview) -> String {
    let mut out = String::new();
    let _ = write_overview(&mut out, overview);
    out
}

fn write_overview(out: &mut String, overview: &PageOverview) -> fmt::Result {
    writeln!(out, "{}", overview.title)?;
    if !overview.class_info.is_empty() {
        writeln!(out, "  {}", overview.class_info)?;
    }
    if !overview.description.is_empty() {
        writeln!(out, "\n{}", overview.description)?;
    }
    if !overview.return_type.is_empty() {
        writeln!(out, "\nReturns: {}", overview.return_type)?;
    }
    if !overview.enum_members.is_empty() {
        writeln!(out, "\nMembers:")?;
        for member in &overview.enum_members {
            write_item(out, member, " = ", member.value.as_deref())?;
        }
    }
    if !overview.methods.is_empty() {
        writeln!(out, "\nMethods:")?;
        for method in &overview.methods {
            write!(out, "  {}{}", method.name, method.signature)?;
            if !method.return_type.is_empty() {
                write!(out, " -> {}", method.return_type)?;
            }
            if !method.description.is_empty() {
                write!(out, "  # {}", method.description)?;
            }
            writeln!(out)?;
        }
    }
    for example in &overview.examples {
        writeln!(out, "\nExample:")?;
        for line in example.lines() {
            writeln!(out, "    {}", line)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Details, Kind, Library, Section};
    use assert2::check;

    #[test]
    fn text_render_lists_details() {
        let record = Record {
            path: "/NTgCalls/Available Enums/StreamMode.xml".to_string(),
            title: "StreamMode".to_string(),
            library: Library::NTgCalls,
            kind: Kind::Enum,
            description: "How a stream is sourced".to_string(),
            example: None,
            details: Details {
                members: vec![Item {
                    name: "CAPTURE".to_string(),
                    value: Some("0".to_string()),
                    ..Item::default()
                }],
                sections: vec![Section {
                    title: "RAISES".to_string(),
                    items: vec![Item::named("", None)],
                }],
                ..Details::default()
            },
            doc_url: "https://pytgcalls.github.io/NTgCalls/Available Enums/StreamMode".to_string(),
        };

        let text = render_text(&record, false);
        check!(text.starts_with("StreamMode (enum, NTgCalls)\n"));
        check!(text.contains("\nMembers:\n  CAPTURE = 0\n"));
        check!(!text.contains("RAISES"));
        check!(text.ends_with("Doc URL: https://pytgcalls.github.io/NTgCalls/Available Enums/StreamMode\n"));
    }

    #[test]
    fn hits_are_numbered() {
        let hits = vec![MarkupHit {
            path: "PyTgCalls/play.xml".to_string(),
            title: "[PyTgCalls] play".to_string(),
            score: 100,
            preview: "**play** media".to_string(),
        }];
        let text = render_markup_hits("play", &hits);
        check!(text.contains("1. [PyTgCalls] play - score 100\n   PyTgCalls/play.xml\n   **play** media\n"));
        check!(render_markup_hits("zzz", &[]) == "No pages match 'zzz'.\n");
    }
}
