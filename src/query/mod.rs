//! Query module
//!
//! The query module regroups the query objects, their weights and scorers.
//! [`ScriptScoreQuery`] rescores the documents of any other query with a script.

mod all_query;
mod boost_query;
mod const_score_query;
mod doc_id_set_query;
mod empty_query;
mod explanation;
#[allow(clippy::module_inception)]
mod query;
mod scorer;
mod script_score_query;
mod vec_docset;
mod weight;

pub use self::all_query::{AllQuery, AllScorer, AllWeight};
pub use self::boost_query::BoostQuery;
pub use self::const_score_query::{ConstScoreQuery, ConstScorer};
pub use self::doc_id_set_query::DocIdSetQuery;
pub use self::empty_query::{EmptyQuery, EmptyScorer, EmptyWeight};
pub use self::explanation::Explanation;
pub use self::query::{EnableScoring, Query, QueryClone, QueryEq};
pub use self::scorer::Scorer;
pub use self::script_score_query::{
    MinScoreScorer, ScriptScoreQuery, ScriptScoreRequest, ScriptScorer,
};
pub use self::vec_docset::VecDocSet;
pub use self::weight::Weight;
