//! Backing storage for arenas
//!
//! Provides both inline (value-scoped) and heap-resident buffers behind one
//! sealed trait, so the bump algorithm in [`Arena`](crate::Arena) exists once.
//!
//! # Safety
//!
//! - Both buffers are fully initialized at construction (zero-filled), so any
//!   byte handed out by the arena is a valid `u8`
//! - `as_ptr()` is stable for the storage's lifetime; neither storage ever
//!   reallocates
//! - Storage is exclusively owned by one arena; the arena is the only code
//!   that derives slices from `as_ptr()`

use core::cell::UnsafeCell;
use core::fmt;
use core::ptr::NonNull;
use std::alloc::{Layout, alloc_zeroed, dealloc};

use crate::error::{ArenaError, ArenaResult};

mod private {
    /// Private sealing trait - cannot be named or implemented outside this module
    pub trait Sealed {}

    impl<const N: usize> Sealed for super::InlineStorage<N> {}
    impl Sealed for super::HeapStorage {}
}

/// Fixed-size byte buffer owned by an arena
///
/// Sealed: the arena relies on the invariants listed in the module docs, so
/// only the two storages defined here may implement it.
pub trait Storage: private::Sealed {
    /// Number of bytes in the buffer
    fn capacity(&self) -> usize;

    /// Base pointer of the buffer, valid for reads and writes of
    /// `capacity()` bytes through shared access
    fn as_ptr(&self) -> *mut u8;
}

// ============================================================================
// Inline storage
// ============================================================================

/// Buffer embedded in the arena value itself
///
/// Large `N` values live wherever the arena lives; a default-capacity arena
/// (4 MiB) on a test thread's stack will overflow it. Arenas are `!Sync`, so
/// a `static` is not an option, and `Box::new` still builds the value on the
/// stack first. Use [`HeapArena`](crate::HeapArena), a smaller `N`, or a
/// thread spawned with a larger stack.
#[repr(transparent)]
pub struct InlineStorage<const N: usize>(UnsafeCell<[u8; N]>);

impl<const N: usize> InlineStorage<N> {
    pub(crate) const fn new() -> Self {
        Self(UnsafeCell::new([0; N]))
    }
}

impl<const N: usize> Storage for InlineStorage<N> {
    #[inline]
    fn capacity(&self) -> usize {
        N
    }

    #[inline]
    fn as_ptr(&self) -> *mut u8 {
        self.0.get().cast::<u8>()
    }
}

impl<const N: usize> fmt::Debug for InlineStorage<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineStorage")
            .field("capacity", &N)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Heap storage
// ============================================================================

/// One heap block of exactly `capacity` bytes
pub struct HeapStorage {
    ptr: NonNull<u8>,
    capacity: usize,
}

impl HeapStorage {
    /// Allocates a zero-filled block through the global allocator
    pub(crate) fn allocate(capacity: usize) -> ArenaResult<Self> {
        if capacity == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity: 0,
            });
        }

        // requests above isize::MAX can never be satisfied
        let layout =
            Layout::array::<u8>(capacity).map_err(|_| ArenaError::out_of_memory(capacity))?;

        // SAFETY: Allocating memory via global allocator.
        // - layout has non-zero size (capacity == 0 handled above)
        // - align = 1 is always valid
        // - alloc_zeroed returns null on failure (handled below)
        let ptr = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or_else(|| ArenaError::out_of_memory(capacity))?;

        Ok(Self { ptr, capacity })
    }
}

impl Storage for HeapStorage {
    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }
}

impl Drop for HeapStorage {
    fn drop(&mut self) {
        if self.capacity == 0 {
            return;
        }

        // SAFETY: Deallocating the block.
        // - ptr was allocated via alloc_zeroed() in allocate() with this layout
        // - capacity and align = 1 formed a valid layout there
        // - This is called exactly once (Drop guarantee)
        unsafe {
            dealloc(
                self.ptr.as_ptr(),
                Layout::from_size_align_unchecked(self.capacity, 1),
            );
        }
    }
}

impl fmt::Debug for HeapStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapStorage")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

// SAFETY: HeapStorage uniquely owns its block.
// - No other handle to the allocation exists
// - Moving the owner to another thread moves the whole block with it
unsafe impl Send for HeapStorage {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_storage_capacity() {
        let storage = InlineStorage::<32>::new();
        assert_eq!(storage.capacity(), 32);
        assert!(!storage.as_ptr().is_null());
    }

    #[test]
    fn test_heap_storage_is_zeroed() {
        let storage = HeapStorage::allocate(128).unwrap();
        assert_eq!(storage.capacity(), 128);

        // SAFETY: storage owns 128 initialized bytes and nothing else borrows them
        let bytes = unsafe { core::slice::from_raw_parts(storage.as_ptr(), 128) };
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_heap_storage_zero_capacity() {
        let storage = HeapStorage::allocate(0).unwrap();
        assert_eq!(storage.capacity(), 0);
    }

    #[test]
    fn test_heap_storage_impossible_size() {
        let err = HeapStorage::allocate(usize::MAX).unwrap_err();
        assert_eq!(err, ArenaError::OutOfMemory { size: usize::MAX });
    }

    #[test]
    fn test_send_bounds() {
        fn assert_send<T: Send>() {}

        assert_send::<HeapStorage>();
        assert_send::<InlineStorage<16>>();
    }
}
