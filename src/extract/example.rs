use crate::markup::Element;
use crate::types::Example;

const CODE_TAG: &str = "syntax-highlight";

/// First code block of the page, direct child preferred.
pub(crate) fn extract_example(page: &Element, default_language: &str) -> Option<Example> {
    let block = page.child(CODE_TAG).or_else(|| page.find(CODE_TAG))?;
    let code = dedent(&block.all_text());
    if code.is_empty() {
        return None;
    }
    let language = block
        .attr("language")
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .unwrap_or(default_language);

    Some(Example {
        language: language.to_string(),
        code,
    })
}

/// Strip the indentation shared by all non-blank lines and drop leading and
/// trailing blank lines. Whitespace-only lines become empty.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(indentation)
        .min()
        .unwrap_or(0);

    let lines: Vec<&str> = text
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                &line[margin..]
            }
        })
        .collect();

    let start = lines.iter().position(|line| !line.is_empty());
    let end = lines.iter().rposition(|line| !line.is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}
