use super::{Element, Node};
use crate::error::MarkupError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;

/// Parse a markup fragment into its root element.
///
/// Text is kept verbatim. Entity unescaping is best-effort: fragments carrying
/// HTML-only entities (`&nbsp;`) keep their raw text instead of failing the page.
/// Content after the first root element is ignored.
pub fn parse(xml: &str) -> Result<Element, MarkupError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(MarkupError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                });
            }
        };
        let position = reader.buffer_position() as u64;

        match event {
            Event::Start(start) => stack.push(open(&start, position)?),
            Event::Empty(start) => {
                let element = open(&start, position)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| MarkupError::Syntax {
                    position,
                    message: "closing tag without a matching opening tag".to_string(),
                })?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let content = text
                        .unescape()
                        .map(Cow::into_owned)
                        .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned());
                    parent.push_text(content);
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(String::from_utf8_lossy(&data).into_owned());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = stack.pop() {
        return Err(MarkupError::Unclosed(unclosed.tag));
    }
    root.ok_or(MarkupError::NoRoot)
}

fn open(start: &BytesStart<'_>, position: u64) -> Result<Element, MarkupError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());

    let mut attributes = start.attributes();
    attributes.with_checks(false);
    for attr in attributes {
        let attr = attr.map_err(|e| MarkupError::Syntax {
            position,
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map(Cow::into_owned)
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        element.attrs.push((key, value));
    }

    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    }
}
