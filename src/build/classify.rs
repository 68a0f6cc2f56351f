use crate::types::{Kind, Library};

/// Path markers checked in order; the first one found decides the kind.
const KIND_MARKERS: &[(&str, Kind)] = &[
    ("Available Enums", Kind::Enum),
    ("Methods", Kind::Method),
    ("Available Structs", Kind::Struct),
    ("Available Types", Kind::Type),
    ("Advanced Types", Kind::Type),
    ("Stream Descriptors", Kind::Descriptor),
];

/// Classify a page by its path.
pub fn classify(path: &str) -> Kind {
    KIND_MARKERS
        .iter()
        .find(|(marker, _)| path.contains(marker))
        .map_or(Kind::Misc, |(_, kind)| *kind)
}

/// Split a page path into its library and the path below the library root.
pub fn library(path: &str) -> (Library, &str) {
    if let Some(suffix) = path.strip_prefix("/NTgCalls/") {
        (Library::NTgCalls, suffix)
    } else if let Some(suffix) = path.strip_prefix("/PyTgCalls/") {
        (Library::PyTgCalls, suffix)
    } else {
        (Library::Unknown, path.trim_start_matches('/'))
    }
}

/// Public documentation URL: `{base}/{library}/{suffix without .xml}`.
pub fn doc_url(base_url: &str, library: Library, suffix: &str) -> String {
    let suffix = suffix.strip_suffix(".xml").unwrap_or(suffix);
    format!("{}/{}/{}", base_url.trim_end_matches('/'), library, suffix)
}
