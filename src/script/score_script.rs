use crate::query::{Explanation, Scorer};
use crate::script::ScriptContext;
use crate::{DocId, Score, SegmentReader};

/// Sink a script may fill with a description of how it computed a score.
///
/// It is only provided when a score is being explained.
#[derive(Clone, Debug, Default)]
pub struct ExplanationHolder {
    description: Option<String>,
}

impl ExplanationHolder {
    /// Records the description of the computation.
    pub fn set<T: ToString>(&mut self, description: T) {
        self.description = Some(description.to_string());
    }

    /// Returns the recorded description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Builds the explanation of `score` out of the recorded description.
    ///
    /// Returns `None` if the script did not describe its computation.
    pub fn get(&self, score: Score, base_explanation: Option<Explanation>) -> Option<Explanation> {
        let description = self.description.as_ref()?;
        let mut explanation = Explanation::new(description, score);
        if let Some(base_explanation) = base_explanation {
            explanation.add_detail(base_explanation);
        }
        Some(explanation)
    }
}

/// A compiled script, bound to one segment for the duration of one search.
///
/// A `ScoreScript` is used by a single thread, and holds the state of the
/// document currently being scored.
pub trait ScoreScript: Send {
    /// Positions the script on `doc`.
    fn set_document(&mut self, doc: DocId);

    /// Computes the score of the current document.
    ///
    /// `base_scorer` is positioned on the current document. Its score is only
    /// meaningful if the factory [needs scores](ScoreScriptFactory::needs_score).
    ///
    /// `explanation` is only provided when the score is being explained.
    fn execute(
        &mut self,
        base_scorer: &mut dyn Scorer,
        explanation: Option<&mut ExplanationHolder>,
    ) -> crate::Result<f64>;
}

/// A compiled script, shared across segments and searches.
pub trait ScoreScriptFactory: Send + Sync + 'static {
    /// Returns true if the script reads the score of the wrapped query.
    ///
    /// If it does not, the wrapped query is evaluated with scoring disabled.
    fn needs_score(&self) -> bool;

    /// Creates the script instance in charge of the segment `reader`.
    fn new_instance(
        &self,
        reader: &SegmentReader,
        context: &ScriptContext,
    ) -> crate::Result<Box<dyn ScoreScript>>;
}
