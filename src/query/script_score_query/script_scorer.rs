use crate::docset::DocSet;
use crate::query::Scorer;
use crate::script::{ExplanationHolder, ScoreScript};
use crate::{DocId, Score, ScriptScoreError};

/// Scorer replacing the score of the wrapped scorer by the result of a script.
///
/// The documents are exactly the ones of the wrapped scorer: iteration is
/// entirely delegated. The script runs lazily, at most once per document.
pub struct ScriptScorer {
    base_scorer: Box<dyn Scorer>,
    script: Box<dyn ScoreScript>,
    explanation: Option<ExplanationHolder>,
    score_cache: Option<Score>,
}

impl ScriptScorer {
    /// Creates a `ScriptScorer`. `base_scorer` is the scorer of the wrapped query.
    pub fn new(base_scorer: Box<dyn Scorer>, script: Box<dyn ScoreScript>) -> ScriptScorer {
        ScriptScorer {
            base_scorer,
            script,
            explanation: None,
            score_cache: None,
        }
    }

    /// Lets the script describe its computation while scoring.
    pub(crate) fn with_explanation(mut self) -> ScriptScorer {
        self.explanation = Some(ExplanationHolder::default());
        self
    }

    /// Returns what the script recorded about its last computation.
    pub(crate) fn explanation(&self) -> Option<&ExplanationHolder> {
        self.explanation.as_ref()
    }

    fn run_script(&mut self) -> crate::Result<Score> {
        let doc = self.base_scorer.doc();
        self.script.set_document(doc);
        let score = self
            .script
            .execute(self.base_scorer.as_mut(), self.explanation.as_mut())?
            as Score;
        if score == Score::NEG_INFINITY || score.is_nan() {
            warn!("script returned an invalid score {score} for doc {doc}");
            return Err(ScriptScoreError::InvalidScore { score, doc });
        }
        Ok(score)
    }
}

impl DocSet for ScriptScorer {
    fn advance(&mut self) -> DocId {
        self.score_cache = None;
        self.base_scorer.advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if target != self.base_scorer.doc() {
            self.score_cache = None;
        }
        self.base_scorer.seek(target)
    }

    fn doc(&self) -> DocId {
        self.base_scorer.doc()
    }

    fn size_hint(&self) -> u32 {
        self.base_scorer.size_hint()
    }

    fn count_including_deleted(&mut self) -> u32 {
        self.score_cache = None;
        self.base_scorer.count_including_deleted()
    }
}

impl Scorer for ScriptScorer {
    fn score(&mut self) -> crate::Result<Score> {
        if let Some(score) = self.score_cache {
            return Ok(score);
        }
        let score = self.run_script()?;
        self.score_cache = Some(score);
        Ok(score)
    }

    /// Scripts can return any finite value: there is no bound tighter than `Score::MAX`.
    fn max_score(&mut self, _up_to: DocId) -> Score {
        Score::MAX
    }
}
