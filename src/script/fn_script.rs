use std::fmt;
use std::sync::Arc;

use crate::docset::TERMINATED;
use crate::query::Scorer;
use crate::script::{ExplanationHolder, ScoreScript, ScoreScriptFactory, ScriptContext};
use crate::{DocId, Score, SegmentOrdinal, SegmentReader};

/// What a [`ScriptFn`] gets to see of the document being scored.
#[derive(Clone, Copy, Debug)]
pub struct ScriptDoc<'a> {
    /// Segment-local id of the document.
    pub doc: DocId,
    /// Score of the wrapped query. `0` if the script does not need scores.
    pub score: Score,
    /// Ordinal of the segment hosting the document.
    pub segment_ord: SegmentOrdinal,
    /// Search context of the query.
    pub context: &'a ScriptContext,
}

/// Scoring function backing a [`FnScriptFactory`].
pub type ScriptFn = Arc<dyn for<'a> Fn(&ScriptDoc<'a>) -> f64 + Send + Sync + 'static>;

/// `ScoreScriptFactory` running a Rust closure.
///
/// ```rust
/// use tantivy_script_score::script::{FnScriptFactory, ScoreScriptFactory};
///
/// let factory = FnScriptFactory::with_fn(true, |doc| doc.score as f64 * 2.0)
///     .with_description("_score * 2");
/// assert!(factory.needs_score());
/// ```
#[derive(Clone)]
pub struct FnScriptFactory {
    function: ScriptFn,
    needs_score: bool,
    description: Option<String>,
}

impl FnScriptFactory {
    /// Creates a factory out of a shared function.
    ///
    /// `needs_score` tells whether the function reads [`ScriptDoc::score`].
    pub fn new(needs_score: bool, function: ScriptFn) -> FnScriptFactory {
        FnScriptFactory {
            function,
            needs_score,
            description: None,
        }
    }

    /// Convenience method to create a factory with a closure.
    pub fn with_fn<F>(needs_score: bool, function: F) -> FnScriptFactory
    where F: for<'a> Fn(&ScriptDoc<'a>) -> f64 + Send + Sync + 'static {
        FnScriptFactory::new(needs_score, Arc::new(function))
    }

    /// Description reported in explanations.
    pub fn with_description<T: ToString>(mut self, description: T) -> FnScriptFactory {
        self.description = Some(description.to_string());
        self
    }
}

impl fmt::Debug for FnScriptFactory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FnScriptFactory")
            .field("needs_score", &self.needs_score)
            .field("description", &self.description)
            .finish()
    }
}

impl ScoreScriptFactory for FnScriptFactory {
    fn needs_score(&self) -> bool {
        self.needs_score
    }

    fn new_instance(
        &self,
        reader: &SegmentReader,
        context: &ScriptContext,
    ) -> crate::Result<Box<dyn ScoreScript>> {
        Ok(Box::new(FnScoreScript {
            function: self.function.clone(),
            needs_score: self.needs_score,
            description: self.description.clone(),
            segment_ord: reader.segment_ord(),
            context: context.clone(),
            doc: TERMINATED,
        }))
    }
}

struct FnScoreScript {
    function: ScriptFn,
    needs_score: bool,
    description: Option<String>,
    segment_ord: SegmentOrdinal,
    context: ScriptContext,
    doc: DocId,
}

impl ScoreScript for FnScoreScript {
    fn set_document(&mut self, doc: DocId) {
        self.doc = doc;
    }

    fn execute(
        &mut self,
        base_scorer: &mut dyn Scorer,
        explanation: Option<&mut ExplanationHolder>,
    ) -> crate::Result<f64> {
        let score = if self.needs_score {
            base_scorer.score()?
        } else {
            0.0
        };
        if let (Some(holder), Some(description)) = (explanation, self.description.as_ref()) {
            holder.set(description);
        }
        let script_doc = ScriptDoc {
            doc: self.doc,
            score,
            segment_ord: self.segment_ord,
            context: &self.context,
        };
        Ok((self.function)(&script_doc))
    }
}
