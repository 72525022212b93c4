use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;

use crate::core::{Executor, SegmentReader};
use crate::query::{EnableScoring, Query, Weight};
use crate::{DocAddress, DocId, Score, SegmentOrdinal};

/// Holds a list of `SegmentReader`s ready for search.
///
/// It guarantees that the `Segment` will not be removed before
/// the destruction of the `Searcher`.
#[derive(Clone)]
pub struct Searcher {
    segment_readers: Vec<SegmentReader>,
    executor: Arc<Executor>,
}

impl Searcher {
    /// Creates a searcher running every segment in the caller thread.
    pub fn new(segment_readers: Vec<SegmentReader>) -> Searcher {
        Searcher::with_executor(segment_readers, Executor::single_thread())
    }

    /// Creates a searcher dispatching segments on the given executor.
    pub fn with_executor(segment_readers: Vec<SegmentReader>, executor: Executor) -> Searcher {
        Searcher {
            segment_readers,
            executor: Arc::new(executor),
        }
    }

    /// Return the list of segment readers
    pub fn segment_readers(&self) -> &[SegmentReader] {
        &self.segment_readers
    }

    /// Returns the segment_reader associated with the given segment_ord
    pub fn segment_reader(&self, segment_ord: SegmentOrdinal) -> &SegmentReader {
        &self.segment_readers[segment_ord as usize]
    }

    /// Returns the executor used to dispatch segments.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Rewrites `query` until it reaches a fixpoint.
    pub fn rewrite(&self, query: &dyn Query) -> crate::Result<Box<dyn Query>> {
        let mut query = query.box_clone();
        while let Some(rewritten) = query.rewrite(self)? {
            debug!("rewrote {:?} into {:?}", query, rewritten);
            query = rewritten;
        }
        Ok(query)
    }

    /// Returns the `limit` best scoring documents for `query`,
    /// sorted by decreasing score.
    ///
    /// Ties are broken by increasing `DocAddress`.
    pub fn search(
        &self,
        query: &dyn Query,
        limit: usize,
    ) -> crate::Result<Vec<(Score, DocAddress)>> {
        let query = self.rewrite(query)?;
        let weight = query.weight(EnableScoring::enabled_from_searcher(self))?;
        let segment_fruits = self.executor.map(
            |segment_reader| top_docs_for_segment(weight.as_ref(), segment_reader, limit),
            self.segment_readers.iter(),
        )?;
        let mut top_docs: Vec<(Score, DocAddress)> =
            segment_fruits.into_iter().flatten().collect();
        top_docs.sort_by(|left, right| {
            right
                .0
                .total_cmp(&left.0)
                .then_with(|| left.1.cmp(&right.1))
        });
        top_docs.truncate(limit);
        Ok(top_docs)
    }
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let segment_ords = self
            .segment_readers
            .iter()
            .map(SegmentReader::segment_ord)
            .collect::<Vec<_>>();
        write!(f, "Searcher({segment_ords:?})")
    }
}

#[derive(PartialEq)]
struct ScoredDoc {
    score: Score,
    doc: DocId,
}

impl Eq for ScoredDoc {}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredDoc {
    // On equal scores, the lowest doc id wins.
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.doc.cmp(&self.doc))
    }
}

fn top_docs_for_segment(
    weight: &dyn Weight,
    reader: &SegmentReader,
    limit: usize,
) -> crate::Result<Vec<(Score, DocAddress)>> {
    if limit == 0 {
        return Ok(Vec::new());
    }
    let mut heap: BinaryHeap<Reverse<ScoredDoc>> = BinaryHeap::with_capacity(limit + 1);
    weight.for_each_pruning(Score::NEG_INFINITY, reader, &mut |doc, score| {
        heap.push(Reverse(ScoredDoc { score, doc }));
        if heap.len() > limit {
            heap.pop();
        }
        match heap.peek() {
            Some(Reverse(lowest)) if heap.len() == limit => lowest.score,
            _ => Score::NEG_INFINITY,
        }
    })?;
    let segment_ord = reader.segment_ord();
    Ok(heap
        .into_iter()
        .map(|Reverse(scored_doc)| {
            (
                scored_doc.score,
                DocAddress::new(segment_ord, scored_doc.doc),
            )
        })
        .collect())
}
