//! RAII helpers for scoped arena allocations

use core::ops::Deref;

use super::{Arena, Mark};
use crate::error::{ArenaError, ArenaResult};
use crate::storage::Storage;

/// RAII guard for scoped allocations within an arena
///
/// This guard saves the current cursor of an arena and automatically rewinds
/// to it when dropped, so temporary allocations are released on every exit
/// path. It derefs to the arena for allocating.
///
/// The guard never lets the cursor fall below its saved mark: there is no
/// `reset` through it, [`rewind`](Self::rewind) only accepts marks taken
/// inside the scope, and nested guards come from [`scope`](Self::scope).
///
/// # Examples
///
/// ```
/// use linear_arena::StackArena;
///
/// let mut arena = StackArena::<64>::new();
/// arena.alloc_copy(b"keep").unwrap();
///
/// {
///     let scope = arena.scope();
///     let scratch = scope.alloc(32).unwrap();
///     scratch.fill(0);
///     // scratch is released when the scope is dropped
/// }
///
/// assert_eq!(arena.used(), 4);
/// ```
#[must_use = "ArenaScope does nothing unless held"]
pub struct ArenaScope<'a, S: Storage> {
    arena: &'a mut Arena<S>,
    mark: Mark,
    active: bool,
}

impl<'a, S: Storage> ArenaScope<'a, S> {
    pub(super) fn new(arena: &'a mut Arena<S>) -> Self {
        Self {
            mark: arena.snapshot(),
            arena,
            active: true,
        }
    }

    /// Returns the saved mark
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Opens a nested scope that rewinds to the current cursor when dropped
    pub fn scope(&mut self) -> ArenaScope<'_, S> {
        ArenaScope::new(self.arena)
    }

    /// Rewinds to a mark taken inside this scope
    ///
    /// Marks before the scope's own mark are rejected with
    /// [`ArenaError::MarkBeforeScope`]; marks ahead of the cursor with
    /// [`ArenaError::InvalidMark`].
    pub fn rewind(&mut self, mark: Mark) -> ArenaResult<()> {
        if mark < self.mark {
            return Err(ArenaError::mark_before_scope(
                mark.offset(),
                self.mark.offset(),
            ));
        }

        self.arena.rewind(mark)
    }

    /// Disarms the guard; allocations made inside the scope survive
    pub fn keep(mut self) {
        self.active = false;
    }
}

impl<S: Storage> Deref for ArenaScope<'_, S> {
    type Target = Arena<S>;

    fn deref(&self) -> &Self::Target {
        self.arena
    }
}

impl<S: Storage> Drop for ArenaScope<'_, S> {
    fn drop(&mut self) {
        if self.active {
            self.arena.truncate(self.mark.offset());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{ArenaError, HeapArena, StackArena};

    #[test]
    fn test_scope_rewinds_on_drop() {
        let mut arena = StackArena::<64>::new();
        arena.alloc(8).unwrap();

        {
            let scope = arena.scope();
            let temp = scope.alloc(16).unwrap();
            assert_eq!(temp.len(), 16);
            assert_eq!(scope.used(), 24);
        }

        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn test_scope_keep() {
        let mut arena = StackArena::<64>::new();

        {
            let scope = arena.scope();
            scope.alloc(12).unwrap();
            scope.keep();
        }

        assert_eq!(arena.used(), 12);
    }

    #[test]
    fn test_nested_scopes() {
        let mut arena = HeapArena::with_capacity(64).unwrap();
        arena.alloc(1).unwrap();
        let outer_mark = arena.snapshot();

        {
            let mut outer = arena.scope();
            outer.alloc(2).unwrap();
            let inner_mark = outer.snapshot();

            {
                let inner = outer.scope();
                inner.alloc(3).unwrap();
                assert_eq!(inner.used(), 6);
            }

            assert_eq!(outer.snapshot(), inner_mark);
        }

        assert_eq!(arena.snapshot(), outer_mark);
    }

    #[test]
    fn test_inner_keep_released_by_outer() {
        let mut arena = StackArena::<32>::new();

        {
            let mut outer = arena.scope();
            let inner = outer.scope();
            inner.alloc(5).unwrap();
            inner.keep();
            assert_eq!(outer.used(), 5);
        }

        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_scope_with_early_return() {
        fn fallible(arena: &mut HeapArena, fail: bool) -> Result<usize, &'static str> {
            let scope = arena.scope();
            let temp = scope.alloc(10).map_err(|_| "capacity")?;

            if fail {
                return Err("failed");
            }

            Ok(temp.len())
        }

        let mut arena = HeapArena::with_capacity(32).unwrap();
        assert!(fallible(&mut arena, true).is_err());
        assert_eq!(arena.used(), 0);

        assert_eq!(fallible(&mut arena, false), Ok(10));
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn test_scope_rewind_within_scope() {
        let mut arena = StackArena::<32>::new();
        arena.alloc(4).unwrap();

        {
            let mut scope = arena.scope();
            scope.alloc(2).unwrap();
            let mark = scope.snapshot();
            scope.alloc(6).unwrap();

            scope.rewind(mark).unwrap();
            assert_eq!(scope.used(), 6);
        }

        assert_eq!(arena.used(), 4);
    }

    #[test]
    fn test_scope_rejects_mark_before_scope() {
        let mut arena = StackArena::<32>::new();
        let start = arena.snapshot();
        arena.alloc(4).unwrap();

        {
            let mut scope = arena.scope();
            let err = scope.rewind(start).unwrap_err();
            assert_eq!(err, ArenaError::MarkBeforeScope { mark: 0, start: 4 });

            // allocations after the failed rewind are still released
            scope.alloc(2).unwrap();
            assert_eq!(scope.used(), 6);
        }

        assert_eq!(arena.used(), 4);
    }

    #[test]
    fn test_scope_applies_rewind_pattern_on_drop() {
        let config = crate::ArenaConfig::new().with_rewind_pattern(0xDD);
        let mut arena = StackArena::<8>::with_config(config).unwrap();

        {
            let scope = arena.scope();
            scope.alloc_copy(&[1, 2, 3]).unwrap();
        }

        assert_eq!(arena.used(), 0);
        assert_eq!(arena.alloc(3).unwrap(), &[0xDD; 3]);
    }
}
