use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::script_score_weight::ScriptScoreWeight;
use crate::core::Searcher;
use crate::query::{EnableScoring, Query, Weight};
use crate::script::{Script, ScoreScriptFactory, ScriptContext};
use crate::{Score, ScriptScoreError, Term};

/// A query that uses a script to compute the score of the documents
/// matched by another query.
///
/// The document set matched by the `ScriptScoreQuery` is the one of the
/// wrapped query, minus the documents whose script score is lower than `min_score`
/// if it is set.
///
/// ```rust
/// use tantivy_script_score::query::{DocIdSetQuery, Query, ScriptScoreQuery};
/// use tantivy_script_score::script::{FnScriptFactory, IndexVersion, Script, ScriptContext};
/// use tantivy_script_score::{DocAddress, Searcher, SegmentReader};
/// use std::sync::Arc;
///
/// fn example() -> tantivy_script_score::Result<()> {
///     let searcher = Searcher::new(vec![SegmentReader::new(0, 10)]);
///     let query = ScriptScoreQuery::new(
///         Box::new(DocIdSetQuery::new(vec![1, 2, 3])),
///         Script::new("doc * 10"),
///         Arc::new(FnScriptFactory::with_fn(false, |doc| doc.doc as f64 * 10.0)),
///         Some(15.0),
///         ScriptContext::new("books", 0, IndexVersion::new(7, 6, 0)),
///     )?;
///     let top_docs = searcher.search(&query, 10)?;
///     assert_eq!(
///         top_docs,
///         vec![(30.0, DocAddress::new(0, 3)), (20.0, DocAddress::new(0, 2))]
///     );
///     let explanation = query.explain(&searcher, DocAddress::new(0, 1))?;
///     assert!(!explanation.is_match());
///     Ok(())
/// }
/// # assert!(example().is_ok());
/// ```
pub struct ScriptScoreQuery {
    query: Box<dyn Query>,
    script: Script,
    script_factory: Arc<dyn ScoreScriptFactory>,
    min_score: Option<Score>,
    context: ScriptContext,
}

impl ScriptScoreQuery {
    /// Creates a new `ScriptScoreQuery`.
    ///
    /// `script` describes the script compiled into `script_factory`.
    /// `min_score` must be finite and positive.
    pub fn new(
        query: Box<dyn Query>,
        script: Script,
        script_factory: Arc<dyn ScoreScriptFactory>,
        min_score: Option<Score>,
        context: ScriptContext,
    ) -> crate::Result<ScriptScoreQuery> {
        let min_score = min_score.map(validate_min_score).transpose()?;
        Ok(ScriptScoreQuery {
            query,
            script,
            script_factory,
            min_score,
            context,
        })
    }

    /// Returns the wrapped query.
    pub fn query(&self) -> &dyn Query {
        self.query.as_ref()
    }

    /// Returns the script description.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Returns the minimum score a document needs to match, if any.
    pub fn min_score(&self) -> Option<Score> {
        self.min_score
    }

    /// Returns the context handed to the script instances.
    pub fn context(&self) -> &ScriptContext {
        &self.context
    }

    fn with_query(&self, query: Box<dyn Query>) -> ScriptScoreQuery {
        ScriptScoreQuery {
            query,
            script: self.script.clone(),
            script_factory: self.script_factory.clone(),
            min_score: self.min_score,
            context: self.context.clone(),
        }
    }
}

fn validate_min_score(min_score: Score) -> crate::Result<Score> {
    if !min_score.is_finite() || min_score < 0.0 {
        return Err(ScriptScoreError::InvalidArgument(format!(
            "min_score must be a finite positive number, got {min_score}"
        )));
    }
    // -0.0 and 0.0 must hash the same.
    Ok(min_score + 0.0)
}

impl Clone for ScriptScoreQuery {
    fn clone(&self) -> Self {
        self.with_query(self.query.box_clone())
    }
}

impl PartialEq for ScriptScoreQuery {
    fn eq(&self, other: &Self) -> bool {
        *self.query == *other.query
            && self.script == other.script
            && self.min_score == other.min_score
            && self.context == other.context
    }
}

impl Eq for ScriptScoreQuery {}

impl Hash for ScriptScoreQuery {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.query.hash(state);
        self.script.hash(state);
        self.min_score.map(Score::to_bits).hash(state);
        self.context.hash(state);
    }
}

impl fmt::Debug for ScriptScoreQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ScriptScore(query={:?}, script={{{}}}",
            self.query, self.script
        )?;
        if let Some(min_score) = self.min_score {
            write!(f, ", min_score={min_score}")?;
        }
        write!(f, ")")
    }
}

impl Query for ScriptScoreQuery {
    fn weight(&self, enable_scoring: EnableScoring<'_>) -> crate::Result<Box<dyn Weight>> {
        if !enable_scoring.is_scoring_enabled() && self.min_score.is_none() {
            debug!("scores are not needed, script {} is skipped", self.script);
            return self.query.weight(enable_scoring);
        }
        let base_scoring = if self.script_factory.needs_score() {
            enable_scoring.with_scoring()?
        } else {
            enable_scoring.without_scoring()
        };
        let weight = self.query.weight(base_scoring)?;
        Ok(Box::new(ScriptScoreWeight::new(
            weight,
            self.script.clone(),
            self.script_factory.clone(),
            self.min_score,
            self.context.clone(),
        )))
    }

    fn rewrite(&self, searcher: &Searcher) -> crate::Result<Option<Box<dyn Query>>> {
        match self.query.rewrite(searcher)? {
            Some(rewritten) if *rewritten != *self.query => {
                Ok(Some(Box::new(self.with_query(rewritten))))
            }
            _ => Ok(None),
        }
    }

    fn query_terms<'a>(&'a self, visitor: &mut dyn FnMut(&'a Term, bool)) {
        self.query.query_terms(visitor);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::collections::BTreeSet;
    use std::hash::{Hash, Hasher};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use maplit::btreeset;
    use serde_json::json;

    use super::ScriptScoreQuery;
    use crate::docset::TERMINATED;
    use crate::query::{
        AllQuery, BoostQuery, ConstScoreQuery, DocIdSetQuery, EmptyQuery, EnableScoring, Query,
        QueryClone, Scorer, Weight,
    };
    use crate::script::{FnScriptFactory, IndexVersion, Script, ScoreScriptFactory, ScriptContext};
    use crate::{DocAddress, DocSet, Score, ScriptScoreError, Searcher, SegmentReader, Term};

    fn test_context() -> ScriptContext {
        ScriptContext::new("books", 0, IndexVersion::new(7, 6, 0))
    }

    fn doc_times_ten() -> Arc<dyn ScoreScriptFactory> {
        Arc::new(FnScriptFactory::with_fn(false, |doc| doc.doc as f64 * 10.0))
    }

    fn script_score_query(
        query: Box<dyn Query>,
        factory: Arc<dyn ScoreScriptFactory>,
        min_score: Option<Score>,
    ) -> ScriptScoreQuery {
        ScriptScoreQuery::new(query, Script::new("doc * 10"), factory, min_score, test_context())
            .unwrap()
    }

    fn hash_of(query: &dyn Query) -> u64 {
        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        hasher.finish()
    }

    fn collect(weight: &dyn Weight, reader: &SegmentReader) -> crate::Result<Vec<(u32, Score)>> {
        let mut docs = Vec::new();
        weight.for_each(reader, &mut |doc, score| docs.push((doc, score)))?;
        Ok(docs)
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct TermsQuery {
        terms: Vec<Term>,
    }

    impl Query for TermsQuery {
        fn weight(&self, enable_scoring: EnableScoring<'_>) -> crate::Result<Box<dyn Weight>> {
            AllQuery.weight(enable_scoring)
        }

        fn query_terms<'a>(&'a self, visitor: &mut dyn FnMut(&'a Term, bool)) {
            for term in &self.terms {
                visitor(term, false);
            }
        }
    }

    /// Query whose weight refuses to run with scoring enabled.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct NoScoringQuery;

    impl Query for NoScoringQuery {
        fn weight(&self, enable_scoring: EnableScoring<'_>) -> crate::Result<Box<dyn Weight>> {
            assert!(!enable_scoring.is_scoring_enabled());
            AllQuery.weight(enable_scoring)
        }
    }

    #[test]
    fn test_script_score_scores() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 10)]);
        let query = script_score_query(
            Box::new(DocIdSetQuery::new(vec![1, 2, 3])),
            doc_times_ten(),
            None,
        );
        let weight = query.weight(EnableScoring::enabled_from_searcher(&searcher))?;
        assert_eq!(
            collect(weight.as_ref(), searcher.segment_reader(0))?,
            vec![(1, 10.0), (2, 20.0), (3, 30.0)]
        );
        Ok(())
    }

    #[test]
    fn test_script_score_min_score() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 10)]);
        let query = script_score_query(
            Box::new(DocIdSetQuery::new(vec![1, 2, 3])),
            doc_times_ten(),
            Some(15.0),
        );
        let weight = query.weight(EnableScoring::enabled_from_searcher(&searcher))?;
        assert_eq!(
            collect(weight.as_ref(), searcher.segment_reader(0))?,
            vec![(2, 20.0), (3, 30.0)]
        );
        assert_eq!(query.count(&searcher)?, 2);
        Ok(())
    }

    #[test]
    fn test_script_score_reads_base_score() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 3)]);
        let factory = Arc::new(FnScriptFactory::with_fn(true, |doc| doc.score as f64 + 1.0));
        let query = script_score_query(
            Box::new(ConstScoreQuery::new(Box::new(AllQuery), 0.5)),
            factory,
            None,
        );
        let weight = query.weight(EnableScoring::enabled_from_searcher(&searcher))?;
        assert_eq!(
            collect(weight.as_ref(), searcher.segment_reader(0))?,
            vec![(0, 1.5), (1, 1.5), (2, 1.5)]
        );
        Ok(())
    }

    #[test]
    fn test_script_score_narrows_to_score() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 1)]);
        let factory = Arc::new(FnScriptFactory::with_fn(true, |doc| doc.score as f64 / 3.0));
        let query = script_score_query(
            Box::new(ConstScoreQuery::new(Box::new(AllQuery), 0.7)),
            factory,
            None,
        );
        let top_docs = searcher.search(&query, 1)?;
        assert_eq!(top_docs.len(), 1);
        assert_nearly_equals!(top_docs[0].0, 0.233_333);
        let explanation = query.explain(&searcher, DocAddress::new(0, 0))?;
        assert_eq!(explanation.value(), top_docs[0].0);
        Ok(())
    }

    #[test]
    fn test_script_score_base_evaluated_without_scores_if_not_needed() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 3)]);
        let query = script_score_query(Box::new(NoScoringQuery), doc_times_ten(), None);
        let weight = query.weight(EnableScoring::enabled_from_searcher(&searcher))?;
        assert_eq!(
            collect(weight.as_ref(), searcher.segment_reader(0))?,
            vec![(0, 0.0), (1, 10.0), (2, 20.0)]
        );
        Ok(())
    }

    #[test]
    fn test_script_score_shortcut_when_scores_are_not_needed() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 5)]);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_script = calls.clone();
        let factory = Arc::new(FnScriptFactory::with_fn(false, move |_| {
            calls_in_script.fetch_add(1, Ordering::SeqCst);
            1.0
        }));
        let base_query = DocIdSetQuery::new(vec![0, 3]);
        let query = script_score_query(Box::new(base_query.clone()), factory, None);
        let reader = searcher.segment_reader(0);

        let weight = query.weight(EnableScoring::disabled_from_searcher(&searcher))?;
        let base_weight = base_query.weight(EnableScoring::disabled_from_searcher(&searcher))?;
        assert_eq!(
            collect(weight.as_ref(), reader)?,
            collect(base_weight.as_ref(), reader)?
        );
        assert_eq!(query.count(&searcher)?, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[test]
    fn test_script_score_needs_searcher_to_score_base() {
        let factory = Arc::new(FnScriptFactory::with_fn(true, |doc| doc.score as f64));
        let query = script_score_query(Box::new(AllQuery), factory, Some(1.0));
        assert!(matches!(
            query.weight(EnableScoring::disabled()),
            Err(ScriptScoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_script_score_no_match_segment() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 5)]);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_script = calls.clone();
        let factory = Arc::new(FnScriptFactory::with_fn(false, move |_| {
            calls_in_script.fetch_add(1, Ordering::SeqCst);
            1.0
        }));
        let query = script_score_query(Box::new(EmptyQuery), factory, Some(0.5));
        let weight = query.weight(EnableScoring::enabled_from_searcher(&searcher))?;
        let scorer = weight.scorer(searcher.segment_reader(0), 1.0)?;
        assert_eq!(scorer.doc(), TERMINATED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[test]
    fn test_script_score_invalid_score_aborts() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 5)]);
        let factory = Arc::new(FnScriptFactory::with_fn(false, |doc| {
            if doc.doc == 3 {
                f64::NAN
            } else {
                1.0
            }
        }));
        for min_score in [None, Some(0.5)] {
            let query = script_score_query(Box::new(AllQuery), factory.clone(), min_score);
            match searcher.search(&query, 10) {
                Err(ScriptScoreError::InvalidScore { doc, score }) => {
                    assert_eq!(doc, 3);
                    assert!(score.is_nan());
                }
                other => panic!("expected an invalid score error, got {other:?}"),
            }
        }
        Ok(())
    }

    #[test]
    fn test_script_score_never_pruned() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 4)]);
        let query = script_score_query(Box::new(AllQuery), doc_times_ten(), None);
        let weight = query.weight(EnableScoring::enabled_from_searcher(&searcher))?;
        let mut scorer = weight.scorer(searcher.segment_reader(0), 1.0)?;
        assert_eq!(scorer.max_score(TERMINATED), Score::MAX);
        let top_docs = searcher.search(&query, 1)?;
        assert_eq!(top_docs, vec![(30.0, DocAddress::new(0, 3))]);
        Ok(())
    }

    #[test]
    fn test_script_score_is_cacheable() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 4)]);
        let reader = searcher.segment_reader(0);
        let enabled = EnableScoring::enabled_from_searcher(&searcher);
        let without_min_score = script_score_query(Box::new(AllQuery), doc_times_ten(), None);
        assert!(without_min_score.weight(enabled)?.is_cacheable(reader));
        let with_min_score = script_score_query(Box::new(AllQuery), doc_times_ten(), Some(1.0));
        assert!(!with_min_score.weight(enabled)?.is_cacheable(reader));
        Ok(())
    }

    #[test]
    fn test_script_score_rewrite() -> crate::Result<()> {
        let searcher = Searcher::new(vec![SegmentReader::new(0, 4)]);
        let unchanged = script_score_query(Box::new(AllQuery), doc_times_ten(), Some(2.0));
        assert!(unchanged.rewrite(&searcher)?.is_none());

        let factory = doc_times_ten();
        let query = script_score_query(
            Box::new(BoostQuery::new(Box::new(AllQuery), 1.0)),
            factory.clone(),
            Some(2.0),
        );
        let rewritten = query.rewrite(&searcher)?.unwrap();
        let expected = script_score_query(Box::new(AllQuery), factory, Some(2.0));
        assert!(*rewritten == *expected.box_clone());
        let rewritten = rewritten.downcast::<ScriptScoreQuery>().ok().unwrap();
        assert_eq!(rewritten.min_score(), Some(2.0));
        assert_eq!(rewritten.context(), &test_context());
        assert!(rewritten.rewrite(&searcher)?.is_none());
        Ok(())
    }

    #[test]
    fn test_script_score_query_terms() {
        let terms = vec![
            Term::from_field_text("title", "wind"),
            Term::from_field_text("title", "name"),
        ];
        let query = script_score_query(
            Box::new(TermsQuery {
                terms: terms.clone(),
            }),
            doc_times_ten(),
            None,
        );
        let mut visited: BTreeSet<Term> = BTreeSet::new();
        query.query_terms(&mut |term, _| {
            visited.insert(term.clone());
        });
        assert_eq!(visited, btreeset! { terms[0].clone(), terms[1].clone() });
    }

    #[test]
    fn test_script_score_min_score_validation() {
        for invalid in [-1.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result = ScriptScoreQuery::new(
                Box::new(AllQuery),
                Script::new("1"),
                doc_times_ten(),
                Some(invalid),
                test_context(),
            );
            assert!(matches!(result, Err(ScriptScoreError::InvalidArgument(_))));
        }
        let query = script_score_query(Box::new(AllQuery), doc_times_ten(), Some(-0.0));
        assert_eq!(query.min_score().unwrap().to_bits(), 0.0f32.to_bits());
    }

    #[test]
    fn test_script_score_equality() {
        let factory = doc_times_ten();
        let build = |query: Box<dyn Query>,
                     script: Script,
                     min_score: Option<Score>,
                     context: ScriptContext| {
            ScriptScoreQuery::new(query, script, factory.clone(), min_score, context).unwrap()
        };
        let reference = build(
            Box::new(AllQuery),
            Script::new("doc * 10"),
            Some(1.0),
            test_context(),
        );
        let same = build(
            Box::new(AllQuery),
            Script::new("doc * 10"),
            Some(1.0),
            test_context(),
        );
        assert!(reference == same);
        assert_eq!(hash_of(&reference), hash_of(&same));

        let no_min_score = build(Box::new(AllQuery), Script::new("doc * 10"), None, test_context());
        assert!(no_min_score
            == build(Box::new(AllQuery), Script::new("doc * 10"), None, test_context()));

        let variants = vec![
            build(Box::new(EmptyQuery), Script::new("doc * 10"), Some(1.0), test_context()),
            build(
                Box::new(AllQuery),
                Script::new("doc * 10").with_param("a", json!(1)),
                Some(1.0),
                test_context(),
            ),
            build(Box::new(AllQuery), Script::new("doc * 10"), Some(2.0), test_context()),
            no_min_score,
            build(
                Box::new(AllQuery),
                Script::new("doc * 10"),
                Some(1.0),
                ScriptContext::new("movies", 0, IndexVersion::new(7, 6, 0)),
            ),
            build(
                Box::new(AllQuery),
                Script::new("doc * 10"),
                Some(1.0),
                ScriptContext::new("books", 1, IndexVersion::new(7, 6, 0)),
            ),
            build(
                Box::new(AllQuery),
                Script::new("doc * 10"),
                Some(1.0),
                ScriptContext::new("books", 0, IndexVersion::new(7, 7, 0)),
            ),
        ];
        for variant in &variants {
            assert!(reference != *variant, "{variant:?}");
        }
    }

    #[test]
    fn test_script_score_debug() {
        let query = script_score_query(Box::new(AllQuery), doc_times_ten(), Some(1.5));
        assert_eq!(
            format!("{query:?}"),
            "ScriptScore(query=AllQuery, script={Script{lang='expression', source='doc * 10', \
             params={}}}, min_score=1.5)"
        );
    }
}
