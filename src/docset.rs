use crate::DocId;

/// Doc id marking the end of a `DocSet`.
///
/// `i32::MAX` rather than `u32::MAX`, so that doc ids stay comparable as signed integers.
pub const TERMINATED: DocId = i32::MAX as u32;

/// Cursor over a sorted set of doc ids.
///
/// A freshly created `DocSet` is positioned on its first doc, or on
/// `TERMINATED` if it is empty. Once terminated, `advance` and `seek`
/// keep returning `TERMINATED`.
pub trait DocSet: Send {
    /// Moves to the next doc and returns it.
    fn advance(&mut self) -> DocId;

    /// Moves to the first doc greater or equal to `target` and returns it.
    ///
    /// `target` must not be lower than the current doc.
    /// `seek(TERMINATED)` consumes the `DocSet`.
    fn seek(&mut self, target: DocId) -> DocId {
        let mut doc = self.doc();
        debug_assert!(doc <= target);
        while doc < target {
            doc = self.advance();
        }
        doc
    }

    /// Returns the current doc.
    fn doc(&self) -> DocId;

    /// Best-effort estimate of the number of docs.
    fn size_hint(&self) -> u32;

    /// Consumes the `DocSet` and returns the number of docs it contained.
    fn count_including_deleted(&mut self) -> u32 {
        let mut count = 0u32;
        let mut doc = self.doc();
        while doc != TERMINATED {
            count += 1;
            doc = self.advance();
        }
        count
    }
}

impl<TDocSet: DocSet + ?Sized> DocSet for Box<TDocSet> {
    fn advance(&mut self) -> DocId {
        (**self).advance()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        (**self).seek(target)
    }

    fn doc(&self) -> DocId {
        (**self).doc()
    }

    fn size_hint(&self) -> u32 {
        (**self).size_hint()
    }

    fn count_including_deleted(&mut self) -> u32 {
        (**self).count_including_deleted()
    }
}
