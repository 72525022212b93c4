use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::{Searcher, SegmentReader};
use crate::query::{EnableScoring, Explanation, Query, Scorer, Weight};
use crate::{DocId, DocSet, Score, Term};

/// `BoostQuery` is a wrapper over a query used to boost its score.
///
/// The document set matched by the `BoostQuery` is strictly the same as the underlying query.
/// The score of each document, is the score of the underlying query multiplied by the `boost`
/// factor.
///
/// A `BoostQuery` with a boost of `1` rewrites to its underlying query.
pub struct BoostQuery {
    query: Box<dyn Query>,
    boost: Score,
}

impl BoostQuery {
    /// Builds a boost query.
    pub fn new(query: Box<dyn Query>, boost: Score) -> BoostQuery {
        BoostQuery { query, boost }
    }
}

impl Clone for BoostQuery {
    fn clone(&self) -> Self {
        BoostQuery {
            query: self.query.box_clone(),
            boost: self.boost,
        }
    }
}

impl PartialEq for BoostQuery {
    fn eq(&self, other: &Self) -> bool {
        self.boost.to_bits() == other.boost.to_bits() && *self.query == *other.query
    }
}

impl Eq for BoostQuery {}

impl Hash for BoostQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.query.hash(state);
        self.boost.to_bits().hash(state);
    }
}

impl fmt::Debug for BoostQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Boost(query={:?}, boost={})", self.query, self.boost)
    }
}

impl Query for BoostQuery {
    fn weight(&self, enable_scoring: EnableScoring<'_>) -> crate::Result<Box<dyn Weight>> {
        let weight_without_boost = self.query.weight(enable_scoring)?;
        let boosted_weight = if enable_scoring.is_scoring_enabled() {
            Box::new(BoostWeight::new(weight_without_boost, self.boost))
        } else {
            weight_without_boost
        };
        Ok(boosted_weight)
    }

    fn rewrite(&self, searcher: &Searcher) -> crate::Result<Option<Box<dyn Query>>> {
        if self.boost == 1.0 {
            return Ok(Some(self.query.box_clone()));
        }
        Ok(self
            .query
            .rewrite(searcher)?
            .map(|query| Box::new(BoostQuery::new(query, self.boost)) as Box<dyn Query>))
    }

    fn query_terms<'a>(&'a self, visitor: &mut dyn FnMut(&'a Term, bool)) {
        self.query.query_terms(visitor)
    }
}

pub(crate) struct BoostWeight {
    weight: Box<dyn Weight>,
    boost: Score,
}

impl BoostWeight {
    pub fn new(weight: Box<dyn Weight>, boost: Score) -> Self {
        BoostWeight { weight, boost }
    }
}

impl Weight for BoostWeight {
    fn scorer(&self, reader: &SegmentReader, boost: Score) -> crate::Result<Box<dyn Scorer>> {
        self.weight.scorer(reader, boost * self.boost)
    }

    fn explain(&self, reader: &SegmentReader, doc: u32) -> crate::Result<Explanation> {
        let underlying_explanation = self.weight.explain(reader, doc)?;
        if !underlying_explanation.is_match() {
            return Ok(underlying_explanation);
        }
        let mut explanation = Explanation::new(
            format!("Boost x{} of ...", self.boost),
            underlying_explanation.value() * self.boost,
        );
        explanation.add_detail(underlying_explanation);
        Ok(explanation)
    }

    fn count(&self, reader: &SegmentReader) -> crate::Result<u32> {
        self.weight.count(reader)
    }

    fn is_cacheable(&self, reader: &SegmentReader) -> bool {
        self.weight.is_cacheable(reader)
    }
}

pub(crate) struct BoostScorer<S: Scorer> {
    underlying: S,
    boost: Score,
}

impl<S: Scorer> BoostScorer<S> {
    pub fn new(underlying: S, boost: Score) -> BoostScorer<S> {
        BoostScorer { underlying, boost }
    }
}

impl<S: Scorer> DocSet for BoostScorer<S> {
    fn advance(&mut self) -> DocId {
        self.underlying.advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        self.underlying.seek(target)
    }

    fn doc(&self) -> u32 {
        self.underlying.doc()
    }

    fn size_hint(&self) -> u32 {
        self.underlying.size_hint()
    }

    fn count_including_deleted(&mut self) -> u32 {
        self.underlying.count_including_deleted()
    }
}

impl<S: Scorer> Scorer for BoostScorer<S> {
    fn score(&mut self) -> crate::Result<Score> {
        Ok(self.underlying.score()? * self.boost)
    }

    fn max_score(&mut self, up_to: DocId) -> Score {
        if self.boost < 0.0 {
            return Score::MAX;
        }
        self.underlying.max_score(up_to) * self.boost
    }
}

#[cfg(test)]
mod tests {
    use super::BoostQuery;
    use crate::query::{AllQuery, ConstScoreQuery, Query, QueryClone};
    use crate::{DocAddress, Searcher, SegmentReader};

    #[test]
    fn test_boost_query_explain() {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 1)]);
        let query = BoostQuery::new(Box::new(AllQuery), 0.2);
        let explanation = query.explain(&searcher, DocAddress::new(0, 0u32)).unwrap();
        assert_eq!(
            explanation.to_pretty_json(),
            "{\n  \"value\": 0.2,\n  \"description\": \"Boost x0.2 of ...\",\n  \"details\": [\n    {\n      \"value\": 1.0,\n      \"description\": \"AllQuery\"\n    }\n  ]\n}"
        )
    }

    #[test]
    fn test_boost_query_rewrite() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 1)]);
        let neutral = BoostQuery::new(Box::new(AllQuery), 1.0);
        let rewritten = neutral.rewrite(&searcher)?.unwrap();
        assert!(*rewritten == *AllQuery.box_clone());

        let boosted = BoostQuery::new(Box::new(AllQuery), 2.0);
        assert!(boosted.rewrite(&searcher)?.is_none());

        let nested = BoostQuery::new(Box::new(BoostQuery::new(Box::new(AllQuery), 1.0)), 2.0);
        let rewritten = nested.rewrite(&searcher)?.unwrap();
        assert!(*rewritten == *BoostQuery::new(Box::new(AllQuery), 2.0).box_clone());
        Ok(())
    }

    #[test]
    fn test_boost_query_score() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 3)]);
        let query = BoostQuery::new(Box::new(ConstScoreQuery::new(Box::new(AllQuery), 0.5)), 4.0);
        let top_docs = searcher.search(&query, 1)?;
        assert_eq!(top_docs, vec![(2.0, DocAddress::new(0, 0))]);
        Ok(())
    }
}
