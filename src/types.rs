//! Normalized documentation records as stored in the snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Classifier assigned to a record once, at build time, from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Method,
    Enum,
    Type,
    Struct,
    Descriptor,
    #[serde(other)]
    Misc,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Enum => "enum",
            Self::Type => "type",
            Self::Struct => "struct",
            Self::Descriptor => "descriptor",
            Self::Misc => "misc",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which library a documentation page belongs to, derived from its path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Library {
    NTgCalls,
    PyTgCalls,
    #[serde(other)]
    Unknown,
}

impl Library {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NTgCalls => "NTgCalls",
            Self::PyTgCalls => "PyTgCalls",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented element: a parameter, enum member, property or raised-error note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub description: String,
    /// Reference id the item was expanded from, if any.
    pub source_config: Option<String>,
    /// Literal value of an enum member.
    pub value: Option<String>,
}

impl Item {
    pub fn named(name: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            name: name.into(),
            type_name,
            ..Self::default()
        }
    }

    /// Append a description fragment, separated by a single space.
    pub fn append_description(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        let current = self.description.trim_end();
        if current.is_empty() {
            self.description = fragment.to_string();
        } else {
            self.description = format!("{} {}", current, fragment);
        }
    }
}

/// A named, ordered list of items under a page (e.g. PARAMETERS, RAISES).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub title: String,
    pub items: Vec<Item>,
}

impl Section {
    /// Case-insensitive title comparison; the stored title stays verbatim.
    pub fn is_titled(&self, title: &str) -> bool {
        self.title.trim().eq_ignore_ascii_case(title)
    }

    pub fn is_raises(&self) -> bool {
        self.is_titled("RAISES")
    }
}

/// A code example attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub language: String,
    pub code: String,
}

/// Structured parts of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Details {
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Item>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Item>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Item>,
}

/// The normalized, persisted representation of one documentation page.
///
/// The path is the snapshot key, so it is not repeated inside the serialized body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(skip)]
    pub path: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "lib", default = "unknown_library")]
    pub library: Library,
    #[serde(default = "misc_kind")]
    pub kind: Kind,
    #[serde(default = "blank_description")]
    pub description: String,
    #[serde(
        default,
        serialize_with = "serialize_example",
        deserialize_with = "deserialize_example"
    )]
    pub example: Option<Example>,
    #[serde(default)]
    pub details: Details,
    #[serde(default)]
    pub doc_url: String,
}

fn unknown_library() -> Library {
    Library::Unknown
}

fn misc_kind() -> Kind {
    Kind::Misc
}

fn blank_description() -> String {
    " ".to_string()
}

/// Snapshot form of an example: `{}` when the page has none.
#[derive(Default, Serialize, Deserialize)]
struct ExampleBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

fn serialize_example<S>(example: &Option<Example>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let body = example.as_ref().map_or_else(ExampleBody::default, |e| ExampleBody {
        language: Some(e.language.clone()),
        code: Some(e.code.clone()),
    });
    body.serialize(serializer)
}

fn deserialize_example<'de, D>(deserializer: D) -> Result<Option<Example>, D::Error>
where
    D: Deserializer<'de>,
{
    let body = Option::<ExampleBody>::deserialize(deserializer)?.unwrap_or_default();
    Ok(body.code.map(|code| Example {
        language: body.language.unwrap_or_default(),
        code,
    }))
}
