//! Owned element tree for the documentation markup.
//!
//! Pages and the reference table are small XML fragments with a handful of
//! custom tags (`h1`, `subtext`, `pg-title`, `category`, `category-title`,
//! `config`, `text`, `syntax-highlight`, ...). The tree keeps text nodes verbatim
//! and in document order so code examples survive with their indentation.

mod parse;

pub use parse::parse;

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First direct child element with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.elements().find(|el| el.is(tag))
    }

    /// All direct child elements with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.is(tag))
    }

    /// Every descendant element (excluding `self`), depth-first in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// First descendant element with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.descendants().find(|el| el.is(tag))
    }

    /// Text that appears before the first child element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(_) => break,
            }
        }
        out
    }

    /// Text pieces of this element and all descendants, in document order.
    pub fn text_pieces(&self) -> Vec<&str> {
        let mut pieces = Vec::new();
        collect_text(&self.children, &mut pieces);
        pieces
    }

    /// All descendant text concatenated.
    pub fn all_text(&self) -> String {
        self.text_pieces().concat()
    }

    /// Non-blank text pieces trimmed and joined with single spaces.
    pub fn joined_text(&self) -> String {
        self.text_pieces()
            .into_iter()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Leading text of the first direct child with the given tag, or empty.
    pub fn child_text(&self, tag: &str) -> String {
        self.child(tag).map(Self::text).unwrap_or_default()
    }

    pub(crate) fn push_text(&mut self, text: String) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }
}

fn collect_text<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push(text),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(iter) = self.stack.last_mut() {
            match iter.next() {
                Some(Node::Element(el)) => {
                    self.stack.push(el.children.iter());
                    return Some(el);
                }
                Some(Node::Text(_)) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Collapse every run of whitespace to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
