use crate::docset::{DocSet, TERMINATED};
use crate::query::Scorer;
use crate::{DocId, Score, ScriptScoreError};

/// Scorer filtering out the documents of the wrapped scorer
/// whose score is lower than `min_score`.
///
/// Unlike most wrapping scorers, it changes the set of matching documents.
/// The wrapped score is computed once per visited document.
///
/// If scoring a document fails, the scorer stops on that document and
/// `score()` returns the error.
pub struct MinScoreScorer<TScorer: Scorer> {
    scorer: TScorer,
    min_score: Score,
    current_score: Score,
    error: Option<ScriptScoreError>,
}

impl<TScorer: Scorer> MinScoreScorer<TScorer> {
    /// Creates a `MinScoreScorer`, positioned on the first matching document.
    pub fn new(scorer: TScorer, min_score: Score) -> MinScoreScorer<TScorer> {
        let mut min_score_scorer = MinScoreScorer {
            scorer,
            min_score,
            current_score: 0.0,
            error: None,
        };
        min_score_scorer.skip_non_matching();
        min_score_scorer
    }

    fn is_current_match(&mut self) -> bool {
        match self.scorer.score() {
            Ok(score) => {
                self.current_score = score;
                score >= self.min_score
            }
            Err(err) => {
                self.error = Some(err);
                true
            }
        }
    }

    fn skip_non_matching(&mut self) -> DocId {
        let mut doc = self.scorer.doc();
        while doc != TERMINATED && !self.is_current_match() {
            doc = self.scorer.advance();
        }
        doc
    }
}

impl<TScorer: Scorer> DocSet for MinScoreScorer<TScorer> {
    fn advance(&mut self) -> DocId {
        self.error = None;
        self.scorer.advance();
        self.skip_non_matching()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.scorer.doc() >= target {
            return self.scorer.doc();
        }
        self.error = None;
        self.scorer.seek(target);
        self.skip_non_matching()
    }

    fn doc(&self) -> DocId {
        self.scorer.doc()
    }

    /// Upper bound: the filter can only remove documents.
    fn size_hint(&self) -> u32 {
        self.scorer.size_hint()
    }
}

impl<TScorer: Scorer> Scorer for MinScoreScorer<TScorer> {
    fn score(&mut self) -> crate::Result<Score> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.current_score),
        }
    }

    fn max_score(&mut self, up_to: DocId) -> Score {
        self.scorer.max_score(up_to)
    }
}
