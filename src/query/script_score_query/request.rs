use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ScriptScoreQuery;
use crate::query::{BoostQuery, Query};
use crate::script::{Script, ScoreScriptFactory, ScriptContext};
use crate::Score;

/// The `script_score` section of a search request.
///
/// ```json
/// {
///     "script": {"source": "doc['likes'] * 2", "params": {}},
///     "min_score": 1.5,
///     "boost": 2.0
/// }
/// ```
///
/// The wrapped query and the compiled script are provided by the caller
/// of [`ScriptScoreRequest::into_query`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptScoreRequest {
    /// Script computing the new score.
    pub script: Script,
    /// Documents scoring strictly less than `min_score` are excluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<Score>,
    /// Boost applied to the wrapped query. Scripts reading `_score` see the
    /// boosted score; the script result itself is not multiplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<Score>,
}

impl ScriptScoreRequest {
    /// Parses a request from its JSON representation.
    pub fn from_json(json: &str) -> crate::Result<ScriptScoreRequest> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the query described by the request, on top of `query`.
    ///
    /// `script_factory` must be the compiled form of `self.script`.
    pub fn into_query(
        self,
        query: Box<dyn Query>,
        script_factory: Arc<dyn ScoreScriptFactory>,
        context: ScriptContext,
    ) -> crate::Result<Box<dyn Query>> {
        let query: Box<dyn Query> = match self.boost {
            Some(boost) => Box::new(BoostQuery::new(query, boost)),
            None => query,
        };
        let script_score_query =
            ScriptScoreQuery::new(query, self.script, script_factory, self.min_score, context)?;
        Ok(Box::new(script_score_query))
    }
}
