use std::ops::DerefMut;

use downcast_rs::impl_downcast;

use crate::docset::DocSet;
use crate::{DocId, Score};

/// Scored set of documents matching a query within a specific segment.
///
/// See [`Query`](crate::query::Query).
pub trait Scorer: downcast_rs::Downcast + DocSet + 'static {
    /// Returns the score.
    ///
    /// This method will perform a bit of computation and is not cached.
    /// An error aborts the evaluation of the whole segment.
    fn score(&mut self) -> crate::Result<Score>;

    /// Returns an upper bound of the scores of the documents
    /// between the current position and `up_to` (inclusive).
    ///
    /// The default bound never restricts anything.
    fn max_score(&mut self, _up_to: DocId) -> Score {
        Score::MAX
    }
}

impl_downcast!(Scorer);

impl Scorer for Box<dyn Scorer> {
    fn score(&mut self) -> crate::Result<Score> {
        self.deref_mut().score()
    }

    fn max_score(&mut self, up_to: DocId) -> Score {
        self.deref_mut().max_score(up_to)
    }
}
