#![warn(missing_docs)]
#![allow(clippy::len_without_is_empty)]

//! # `tantivy-script-score`
//!
//! A rescoring layer for tantivy-style search engines.
//!
//! [`ScriptScoreQuery`](query::ScriptScoreQuery) wraps a base query and replaces the
//! score of every document it matches with the result of an externally compiled
//! scoring script. Optionally, documents whose computed score is below a `min_score`
//! are removed from the match set.
//!
//! The crate follows the usual layering:
//! - a [`Query`](query::Query) is a recipe to match and score documents,
//! - a [`Weight`](query::Weight) is that recipe bound to a [`Searcher`],
//! - a [`Scorer`](query::Scorer) is a cursor over the matching documents of one
//!   [`SegmentReader`],
//! - an [`Explanation`](query::Explanation) describes how a given score was obtained.
//!
//! Scripts are plugged through the [`ScoreScriptFactory`](script::ScoreScriptFactory)
//! capability. Compiling script sources is left to the host.

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

mod core;
mod docset;
mod error;
mod term;

pub mod query;
pub mod script;

pub use crate::core::{Executor, Searcher, SegmentReader};
pub use crate::docset::{DocSet, TERMINATED};
pub use crate::error::ScriptScoreError;
pub use crate::term::Term;

/// Index format version, as handed over to scripts.
pub use crate::script::IndexVersion;

/// Tantivy-style result type.
pub type Result<T> = std::result::Result<T, ScriptScoreError>;

/// A `u32` identifying a document within a segment.
/// Documents have their `DocId` assigned incrementally,
/// as they are added in the segment.
pub type DocId = u32;

/// A f32 that represents the relevance of the document to the query
///
/// This is modelled internally as a `f32`. The larger the number, the more relevant
/// the document to the search query.
pub type Score = f32;

/// A `SegmentOrdinal` identifies a segment, within a `Searcher`.
pub type SegmentOrdinal = u32;

/// `DocAddress` contains all the necessary information
/// to identify a document given a `Searcher` object.
///
/// It consists of an id identifying its segment, and
/// a segment-local `DocId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocAddress {
    /// The segment ordinal id that identifies the segment
    /// hosting the document in the `Searcher` it is called from.
    pub segment_ord: SegmentOrdinal,
    /// The segment-local `DocId`.
    pub doc_id: DocId,
}

impl DocAddress {
    /// Creates a new DocAddress from the segment/docId pair.
    pub fn new(segment_ord: SegmentOrdinal, doc_id: DocId) -> DocAddress {
        DocAddress {
            segment_ord,
            doc_id,
        }
    }
}
