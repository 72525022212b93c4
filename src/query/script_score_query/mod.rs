mod min_score_scorer;
mod request;
#[allow(clippy::module_inception)]
mod script_score_query;
mod script_score_weight;
mod script_scorer;

pub use self::min_score_scorer::MinScoreScorer;
pub use self::request::ScriptScoreRequest;
pub use self::script_score_query::ScriptScoreQuery;
pub use self::script_scorer::ScriptScorer;
