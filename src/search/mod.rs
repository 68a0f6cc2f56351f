//! Retrieval over the documentation.
//!
//! Two rankers share one interface: the record index scores normalized records
//! from the snapshot, the markup index scores the raw page map directly.

mod markup;
mod records;
pub(crate) mod scoring;

pub use markup::{MarkupHit, MarkupIndex, MethodSummary, PageOverview};
pub use records::{PathSuggestion, RecordIndex};
pub use scoring::record_score;

/// A ranked keyword search over some document collection.
pub trait RankedSearch {
    type Hit<'a>
    where
        Self: 'a;

    /// Best matches for `query`, best first, at most `limit`.
    /// Blank queries return nothing.
    fn search<'a>(&'a self, query: &str, limit: usize) -> Vec<Self::Hit<'a>>;
}
