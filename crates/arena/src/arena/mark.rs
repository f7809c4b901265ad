//! Mark for saving/restoring the arena cursor

/// Snapshot of an arena's cursor
///
/// A plain value: it holds an offset, not a reference, so it can outlive any
/// borrow of the arena. It is only meaningful for the arena it was taken from
/// or a clone of that arena, since clones keep offsets intact. Once a rewind
/// or reset moves the cursor below the mark, the arena rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark {
    pub(super) offset: usize,
}

impl Mark {
    /// Mark of an empty arena
    pub const START: Self = Self { offset: 0 };

    /// Byte offset captured by this mark
    #[inline]
    pub const fn offset(self) -> usize {
        self.offset
    }
}
