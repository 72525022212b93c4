use crate::core::SegmentReader;
use crate::query::const_score_query::ConstScorer;
use crate::query::vec_docset::VecDocSet;
use crate::query::{EnableScoring, Explanation, Query, Scorer, Weight};
use crate::{DocId, Score};

/// Query matching an explicit set of segment-local doc ids.
///
/// The same doc ids are matched in every segment, as long as they are lower than
/// the segment's `max_doc`. All of the documents get the score 1.0.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocIdSetQuery {
    doc_ids: Vec<DocId>,
}

impl DocIdSetQuery {
    /// Creates a query matching `doc_ids`. Order and duplicates do not matter.
    pub fn new(mut doc_ids: Vec<DocId>) -> DocIdSetQuery {
        doc_ids.sort_unstable();
        doc_ids.dedup();
        DocIdSetQuery { doc_ids }
    }
}

impl Query for DocIdSetQuery {
    fn weight(&self, _enable_scoring: EnableScoring<'_>) -> crate::Result<Box<dyn Weight>> {
        Ok(Box::new(DocIdSetWeight {
            doc_ids: self.doc_ids.clone(),
        }))
    }
}

struct DocIdSetWeight {
    doc_ids: Vec<DocId>,
}

impl Weight for DocIdSetWeight {
    fn scorer(&self, reader: &SegmentReader, boost: Score) -> crate::Result<Box<dyn Scorer>> {
        let doc_ids: Vec<DocId> = self
            .doc_ids
            .iter()
            .copied()
            .take_while(|&doc| doc < reader.max_doc())
            .collect();
        Ok(Box::new(ConstScorer::new(VecDocSet::from(doc_ids), boost)))
    }

    fn explain(&self, reader: &SegmentReader, doc: DocId) -> crate::Result<Explanation> {
        if doc < reader.max_doc() && self.doc_ids.binary_search(&doc).is_ok() {
            Ok(Explanation::new("DocIdSetQuery", 1.0))
        } else {
            Ok(Explanation::does_not_match(format!(
                "Document #({doc}) is not in the doc id set"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DocIdSetQuery;
    use crate::docset::TERMINATED;
    use crate::query::{EnableScoring, Query};
    use crate::{DocAddress, DocSet, Searcher, SegmentReader};

    #[test]
    fn test_doc_id_set_query_is_bounded_by_max_doc() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 3)]);
        let query = DocIdSetQuery::new(vec![4, 1, 2, 1]);
        let weight = query.weight(EnableScoring::enabled_from_searcher(&searcher))?;
        let mut scorer = weight.scorer(searcher.segment_reader(0), 1.0)?;
        assert_eq!(scorer.doc(), 1);
        assert_eq!(scorer.score()?, 1.0);
        assert_eq!(scorer.advance(), 2);
        assert_eq!(scorer.advance(), TERMINATED);
        assert!(!query.explain(&searcher, DocAddress::new(0, 4))?.is_match());
        assert!(query.explain(&searcher, DocAddress::new(0, 2))?.is_match());
        Ok(())
    }

    #[test]
    fn test_doc_id_set_query_normalizes_ids() {
        assert_eq!(
            DocIdSetQuery::new(vec![3, 1, 3]),
            DocIdSetQuery::new(vec![1, 3])
        );
    }
}
