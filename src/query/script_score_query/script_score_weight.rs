use std::sync::Arc;

use super::{MinScoreScorer, ScriptScorer};
use crate::core::SegmentReader;
use crate::docset::{DocSet, TERMINATED};
use crate::query::{Explanation, Scorer, Weight};
use crate::script::{Script, ScoreScriptFactory, ScriptContext};
use crate::{DocId, Score, ScriptScoreError};

/// Weight of a [`ScriptScoreQuery`](super::ScriptScoreQuery).
///
/// It is shared read-only by all of the segments of a search.
pub(crate) struct ScriptScoreWeight {
    weight: Box<dyn Weight>,
    script: Script,
    script_factory: Arc<dyn ScoreScriptFactory>,
    min_score: Option<Score>,
    context: ScriptContext,
    needs_score: bool,
}

impl ScriptScoreWeight {
    pub fn new(
        weight: Box<dyn Weight>,
        script: Script,
        script_factory: Arc<dyn ScoreScriptFactory>,
        min_score: Option<Score>,
        context: ScriptContext,
    ) -> ScriptScoreWeight {
        let needs_score = script_factory.needs_score();
        ScriptScoreWeight {
            weight,
            script,
            script_factory,
            min_score,
            context,
            needs_score,
        }
    }

    fn script_scorer(
        &self,
        base_scorer: Box<dyn Scorer>,
        reader: &SegmentReader,
    ) -> crate::Result<ScriptScorer> {
        let script = self.script_factory.new_instance(reader, &self.context)?;
        Ok(ScriptScorer::new(base_scorer, script))
    }

    fn default_explanation(&self, score: Score, base_explanation: Explanation) -> Explanation {
        let description = format!(
            "script score function, computed with script:\"{}\"",
            self.script
        );
        let mut explanation = Explanation::new(description, score);
        if self.needs_score {
            let mut base_score_explanation =
                Explanation::new("_score: ", base_explanation.value());
            base_score_explanation.add_detail(base_explanation);
            explanation.add_detail(base_score_explanation);
        }
        explanation
    }
}

impl Weight for ScriptScoreWeight {
    fn scorer(&self, reader: &SegmentReader, boost: Score) -> crate::Result<Box<dyn Scorer>> {
        let base_scorer = self.weight.scorer(reader, boost)?;
        if base_scorer.doc() == TERMINATED {
            return Ok(base_scorer);
        }
        let script_scorer = self.script_scorer(base_scorer, reader)?;
        Ok(match self.min_score {
            Some(min_score) => Box::new(MinScoreScorer::new(script_scorer, min_score)),
            None => Box::new(script_scorer),
        })
    }

    fn explain(&self, reader: &SegmentReader, doc: DocId) -> crate::Result<Explanation> {
        let base_explanation = self.weight.explain(reader, doc)?;
        if !base_explanation.is_match() {
            return Ok(base_explanation);
        }
        let base_scorer = self.weight.scorer(reader, 1.0)?;
        let mut scorer = self.script_scorer(base_scorer, reader)?.with_explanation();
        if scorer.doc() > doc || scorer.seek(doc) != doc {
            return Err(ScriptScoreError::InternalError(format!(
                "Document #({doc}) was matched by the wrapped query but its scorer did not \
                 reach it (landed on #({}))",
                scorer.doc()
            )));
        }
        let score = scorer.score()?;

        let script_explanation = scorer.explanation().and_then(|holder| {
            holder.get(score, self.needs_score.then(|| base_explanation.clone()))
        });
        let explanation = match script_explanation {
            Some(explanation) => explanation,
            None => self.default_explanation(score, base_explanation),
        };

        match self.min_score {
            Some(min_score) if score < min_score => Ok(Explanation::no_match(
                format!("Score value is too low, expected at least {min_score:?} but got {score:?}"),
                explanation,
            )),
            _ => Ok(explanation),
        }
    }

    fn count(&self, reader: &SegmentReader) -> crate::Result<u32> {
        if self.min_score.is_none() {
            return self.weight.count(reader);
        }
        let mut scorer = self.scorer(reader, 1.0)?;
        let mut count = 0u32;
        let mut doc = scorer.doc();
        while doc != TERMINATED {
            scorer.score()?;
            count += 1;
            doc = scorer.advance();
        }
        Ok(count)
    }

    /// With a `min_score`, whether a document matches depends on scoring, not only on
    /// the segment.
    fn is_cacheable(&self, reader: &SegmentReader) -> bool {
        self.min_score.is_none() && self.weight.is_cacheable(reader)
    }
}
