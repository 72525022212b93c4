use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use downcast_rs::impl_downcast;

use super::Weight;
use crate::core::Searcher;
use crate::query::Explanation;
use crate::{DocAddress, ScriptScoreError, Term};

/// Argument used in `Query::weight(..)`
#[derive(Copy, Clone, Debug)]
pub enum EnableScoring<'a> {
    /// Pass this to enable scoring.
    Enabled {
        /// The searcher to use during scoring.
        searcher: &'a Searcher,
    },
    /// Pass this to disable scoring.
    /// This can improve performance.
    Disabled {
        /// Searcher should be provided if available.
        searcher_opt: Option<&'a Searcher>,
    },
}

impl<'a> EnableScoring<'a> {
    /// Create using [Searcher] with scoring enabled.
    pub fn enabled_from_searcher(searcher: &'a Searcher) -> EnableScoring<'a> {
        EnableScoring::Enabled { searcher }
    }

    /// Create using [Searcher] with scoring disabled.
    pub fn disabled_from_searcher(searcher: &'a Searcher) -> EnableScoring<'a> {
        EnableScoring::Disabled {
            searcher_opt: Some(searcher),
        }
    }

    /// Create without any searcher, with scoring disabled.
    pub fn disabled() -> EnableScoring<'a> {
        EnableScoring::Disabled { searcher_opt: None }
    }

    /// Returns the searcher if available.
    pub fn searcher(&self) -> Option<&'a Searcher> {
        match *self {
            EnableScoring::Enabled { searcher } => Some(searcher),
            EnableScoring::Disabled { searcher_opt } => searcher_opt,
        }
    }

    /// Returns true if the scoring is enabled.
    pub fn is_scoring_enabled(&self) -> bool {
        matches!(self, EnableScoring::Enabled { .. })
    }

    /// Returns the same request with scoring turned on.
    ///
    /// Scoring requires a searcher: this fails if scoring was disabled
    /// without one.
    pub fn with_scoring(self) -> crate::Result<EnableScoring<'a>> {
        match self.searcher() {
            Some(searcher) => Ok(EnableScoring::enabled_from_searcher(searcher)),
            None => Err(ScriptScoreError::InvalidArgument(
                "Scoring was requested but no searcher is available".to_string(),
            )),
        }
    }

    /// Returns the same request with scoring turned off.
    pub fn without_scoring(self) -> EnableScoring<'a> {
        EnableScoring::Disabled {
            searcher_opt: self.searcher(),
        }
    }
}

/// The `Query` trait defines a set of documents and a scoring method
/// for those documents.
///
/// The `Query` trait is in charge of defining :
///
/// - a set of documents
/// - a way to score these documents
///
/// Because our index is actually split into segments, the
/// query does not actually directly creates [`DocSet`](crate::DocSet) object.
/// Instead, the query creates a [`Weight`] object for a given searcher.
///
/// The weight object, in turn, makes it possible to create
/// a scorer for a specific [`SegmentReader`](crate::SegmentReader).
///
/// So to sum it up :
/// - a `Query` is a recipe to define a set of documents as well the way to score them.
/// - a [`Weight`] is this recipe tied to a specific [`Searcher`]. It may for instance
/// hold statistics about the different term of the query. It is created by the query.
/// - a [`Scorer`](crate::query::Scorer) is a cursor over the set of matching documents, for a
/// specific [`SegmentReader`](crate::SegmentReader). It is created by the [`Weight`].
///
/// When implementing a new type of `Query`, it is normal to implement a
/// dedicated `Query`, [`Weight`] and [`Scorer`](crate::query::Scorer).
///
/// Queries compare and hash structurally: two boxed queries are equal if they have
/// the same concrete type and their fields are equal.
pub trait Query: QueryClone + QueryEq + Send + Sync + downcast_rs::Downcast + fmt::Debug {
    /// Create the weight associated with a query.
    ///
    /// If scoring is not required, setting `scoring_enabled` to `false`
    /// can increase performances.
    ///
    /// See [`Weight`].
    fn weight(&self, enable_scoring: EnableScoring<'_>) -> crate::Result<Box<dyn Weight>>;

    /// Returns an `Explanation` for the score of the document.
    fn explain(&self, searcher: &Searcher, doc_address: DocAddress) -> crate::Result<Explanation> {
        let weight = self.weight(EnableScoring::enabled_from_searcher(searcher))?;
        let reader = searcher.segment_reader(doc_address.segment_ord);
        weight.explain(reader, doc_address.doc_id)
    }

    /// Returns the number of documents matching the query.
    fn count(&self, searcher: &Searcher) -> crate::Result<usize> {
        let weight = self.weight(EnableScoring::disabled_from_searcher(searcher))?;
        let mut result = 0;
        for reader in searcher.segment_readers() {
            result += weight.count(reader)? as usize;
        }
        Ok(result)
    }

    /// Rewrites the query into a simpler, equivalent one.
    ///
    /// Returns `None` if the query is already in its final form.
    /// Rewriting the result again must eventually return `None`.
    fn rewrite(&self, _searcher: &Searcher) -> crate::Result<Option<Box<dyn Query>>> {
        Ok(None)
    }

    /// Extract all of the terms associated with the query and pass them to the
    /// given closure.
    ///
    /// Each term is associated with a boolean indicating whether
    /// positions are required or not.
    ///
    /// Note that there can be multiple instances of any given term
    /// in a query and deduplication must be handled by the visitor.
    fn query_terms<'a>(&'a self, _visitor: &mut dyn FnMut(&'a Term, bool)) {}
}

/// Implements `box_clone`.
pub trait QueryClone {
    /// Returns a boxed clone of `self`.
    fn box_clone(&self) -> Box<dyn Query>;
}

impl<T> QueryClone for T
where T: 'static + Query + Clone
{
    fn box_clone(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }
}

/// Structural equality and hashing over `dyn Query`.
pub trait QueryEq {
    /// Returns true if `other` has the same concrete type and is equal to `self`.
    fn query_eq(&self, other: &dyn Query) -> bool;

    /// Feeds the concrete type and the fields of `self` to `state`.
    fn query_hash(&self, state: &mut dyn Hasher);
}

impl<T> QueryEq for T
where T: 'static + Query + PartialEq + Hash
{
    fn query_eq(&self, other: &dyn Query) -> bool {
        other
            .downcast_ref::<T>()
            .map(|other| self == other)
            .unwrap_or(false)
    }

    fn query_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

impl PartialEq for dyn Query {
    fn eq(&self, other: &dyn Query) -> bool {
        self.query_eq(other)
    }
}

impl Eq for dyn Query {}

impl Hash for dyn Query {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.query_hash(state)
    }
}

impl_downcast!(Query);
