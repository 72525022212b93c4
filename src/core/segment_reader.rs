use std::fmt;

use crate::{DocId, SegmentOrdinal};

/// Handle over one segment of the index, as seen by the query layer.
///
/// Storage is owned by the host engine. The query layer only needs to know
/// which segment it is working on and the range of doc ids it may hold.
#[derive(Clone, PartialEq, Eq)]
pub struct SegmentReader {
    segment_ord: SegmentOrdinal,
    max_doc: DocId,
}

impl SegmentReader {
    /// Creates a reader for the segment `segment_ord`, holding docs `0..max_doc`.
    pub fn new(segment_ord: SegmentOrdinal, max_doc: DocId) -> SegmentReader {
        SegmentReader {
            segment_ord,
            max_doc,
        }
    }

    /// Returns the ordinal of the segment within its `Searcher`.
    pub fn segment_ord(&self) -> SegmentOrdinal {
        self.segment_ord
    }

    /// Returns the highest document id ever attributed in
    /// this segment + 1.
    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }
}

impl fmt::Debug for SegmentReader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SegmentReader(ord={}, max_doc={})",
            self.segment_ord, self.max_doc
        )
    }
}
