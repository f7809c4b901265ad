//! Linear bump arena
//!
//! # Safety
//!
//! This module implements a single-threaded bump allocator over a fixed buffer:
//! - `Cell` for the cursor (no synchronization, arena is `!Sync`)
//! - Storage wrapped in `UnsafeCell`/raw block for interior mutability
//! - Allocation takes `&self` and hands out disjoint `&mut [u8]` ranges
//! - Rewind, reset and clone take `&mut self`, so no handed-out range can be
//!   alive while the cursor moves back or live bytes are read
//!
//! ## Invariants
//!
//! - `0 <= size <= capacity` at all times
//! - Every range handed out lies in `[0, size)` at the time it is returned
//! - The cursor only moves forward through `&self`
//! - `peak >= size`

use core::cell::Cell;
use core::fmt;
use core::slice;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

use crate::config::{ArenaConfig, DEFAULT_CAPACITY};
use crate::error::{ArenaError, ArenaResult};
use crate::storage::{HeapStorage, InlineStorage, Storage};

mod mark;
mod scope;

pub use mark::Mark;
pub use scope::ArenaScope;

/// Arena with its buffer embedded in the value
pub type StackArena<const N: usize = DEFAULT_CAPACITY> = Arena<InlineStorage<N>>;

/// Arena with a heap buffer sized at construction
pub type HeapArena = Arena<HeapStorage>;

/// Bump allocator over one contiguous buffer of fixed capacity
pub struct Arena<S: Storage> {
    storage: S,
    size: Cell<usize>,
    peak: Cell<usize>,
    config: ArenaConfig,
}

impl<const N: usize> Arena<InlineStorage<N>> {
    /// Creates an empty inline arena of `N` bytes
    pub const fn new() -> Self {
        Self {
            storage: InlineStorage::new(),
            size: Cell::new(0),
            peak: Cell::new(0),
            config: ArenaConfig::new().with_max_capacity(N),
        }
    }

    /// Creates an inline arena using the fill patterns of `config`
    ///
    /// `config.max_capacity` is replaced by `N`.
    pub fn with_config(config: ArenaConfig) -> ArenaResult<Self> {
        config.validate()?;

        Ok(Self {
            storage: InlineStorage::new(),
            size: Cell::new(0),
            peak: Cell::new(0),
            config: config.with_max_capacity(N),
        })
    }
}

impl<const N: usize> Default for Arena<InlineStorage<N>> {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena<HeapStorage> {
    /// Creates a heap arena of [`DEFAULT_CAPACITY`] bytes
    pub fn new() -> ArenaResult<Self> {
        Self::with_config(ArenaConfig::default())
    }

    /// Creates a heap arena of `capacity` bytes
    pub fn with_capacity(capacity: usize) -> ArenaResult<Self> {
        Self::with_config(ArenaConfig::default().with_max_capacity(capacity))
    }

    /// Creates a heap arena with specified configuration
    pub fn with_config(config: ArenaConfig) -> ArenaResult<Self> {
        config.validate()?;
        let storage = HeapStorage::allocate(config.max_capacity)?;

        #[cfg(feature = "logging")]
        debug!(capacity = config.max_capacity, "created heap arena");

        Ok(Self {
            storage,
            size: Cell::new(0),
            peak: Cell::new(0),
            config,
        })
    }

    /// Releases the backing block
    ///
    /// Dropping the arena does the same; this only makes the release point
    /// explicit at the call site.
    pub fn release(self) {
        #[cfg(feature = "logging")]
        debug!(
            capacity = self.capacity(),
            used = self.used(),
            "released heap arena"
        );

        drop(self);
    }
}

impl<S: Storage> Arena<S> {
    /// Total capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Currently used bytes
    #[inline]
    pub fn used(&self) -> usize {
        self.size.get()
    }

    /// Bytes still available
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.used()
    }

    /// Whether nothing is allocated
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    /// Highest `used()` since construction or the last reset
    #[inline]
    pub fn peak(&self) -> usize {
        self.peak.get()
    }

    /// Active configuration
    #[inline]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Reserves `n` bytes and returns their starting offset
    fn bump(&self, n: usize) -> ArenaResult<usize> {
        let used = self.size.get();
        let capacity = self.capacity();

        let end = used
            .checked_add(n)
            .filter(|&end| end <= capacity)
            .ok_or_else(|| ArenaError::capacity_exceeded(n, used, capacity))?;

        self.size.set(end);
        if end > self.peak.get() {
            self.peak.set(end);
        }

        Ok(used)
    }

    /// Allocates `n` bytes
    ///
    /// The region is not cleared: it holds whatever the buffer held at that
    /// offset (zero when fresh, stale data after a rewind), or the configured
    /// alloc pattern. No alignment beyond one byte is guaranteed.
    #[must_use = "allocated memory must be used"]
    pub fn alloc(&self, n: usize) -> ArenaResult<&mut [u8]> {
        let offset = self.bump(n)?;

        // SAFETY: Creating a slice over freshly reserved bytes.
        // - offset + n <= capacity (checked in bump)
        // - [offset, offset + n) was beyond the cursor until bump advanced it,
        //   so no other live slice covers it
        // - storage bytes are initialized (zero-filled at construction)
        // - lifetime bound to &self; cursor cannot move back without &mut self
        let region = unsafe { slice::from_raw_parts_mut(self.storage.as_ptr().add(offset), n) };

        if let Some(pattern) = self.config.alloc_pattern {
            region.fill(pattern);
        }

        Ok(region)
    }

    /// Allocates `n` bytes cleared to zero
    #[must_use = "allocated memory must be used"]
    pub fn alloc_zeroed(&self, n: usize) -> ArenaResult<&mut [u8]> {
        let region = self.alloc(n)?;
        region.fill(0);
        Ok(region)
    }

    /// Allocates a copy of `bytes`
    #[must_use = "allocated memory must be used"]
    pub fn alloc_copy(&self, bytes: &[u8]) -> ArenaResult<&mut [u8]> {
        let region = self.alloc(bytes.len())?;
        region.copy_from_slice(bytes);
        Ok(region)
    }

    /// Allocates a copy of `s`
    #[must_use = "allocated memory must be used"]
    pub fn alloc_str(&self, s: &str) -> ArenaResult<&mut str> {
        let bytes = self.alloc_copy(s.as_bytes())?;
        // SAFETY: Creating &mut str from bytes.
        // - bytes holds an exact copy of a valid &str
        // - no padding or pattern is written after the copy
        Ok(unsafe { core::str::from_utf8_unchecked_mut(bytes) })
    }

    /// Captures the current cursor
    #[inline]
    pub fn snapshot(&self) -> Mark {
        Mark {
            offset: self.size.get(),
        }
    }

    /// Moves the cursor back to `mark`, discarding later allocations
    ///
    /// Bytes are left in place unless a rewind pattern is configured. A mark
    /// ahead of the cursor is rejected and leaves the arena untouched.
    pub fn rewind(&mut self, mark: Mark) -> ArenaResult<()> {
        let size = self.size.get();
        if mark.offset > size {
            return Err(ArenaError::invalid_mark(mark.offset, size));
        }

        self.truncate(mark.offset);
        Ok(())
    }

    /// Moves the cursor back to `offset`, which must not exceed `used()`
    fn truncate(&mut self, offset: usize) {
        let size = self.size.get();
        debug_assert!(offset <= size, "truncate past the cursor");

        self.discard(offset, size);
        self.size.set(offset);

        #[cfg(feature = "logging")]
        trace!(from = size, to = offset, "arena rewound");
    }

    /// Discards everything; the buffer itself is kept
    pub fn reset(&mut self) {
        let size = self.size.get();
        self.discard(0, size);
        self.size.set(0);
        self.peak.set(0);

        #[cfg(feature = "logging")]
        debug!(discarded = size, "arena reset");
    }

    /// Creates a guard that rewinds to the current cursor when dropped
    pub fn scope(&mut self) -> ArenaScope<'_, S> {
        ArenaScope::new(self)
    }

    /// Grows `old` to `new_size` bytes
    ///
    /// Shrinking (or keeping the size) returns `old` truncated to `new_size`
    /// with the cursor untouched. Growing allocates a fresh region, copies
    /// `old` into its prefix and abandons the old bytes; the cursor advances by
    /// exactly `new_size`.
    #[must_use = "reallocated memory must be used"]
    pub fn realloc<'a>(&'a self, old: &'a mut [u8], new_size: usize) -> ArenaResult<&'a mut [u8]> {
        if !self.owns(old) {
            return Err(ArenaError::foreign_region(old.as_ptr() as usize, old.len()));
        }

        if new_size <= old.len() {
            return Ok(&mut old[..new_size]);
        }

        let region = self.alloc(new_size)?;
        region[..old.len()].copy_from_slice(old);
        Ok(region)
    }

    /// Copies the live bytes into a new heap arena with `extra_capacity` more room
    ///
    /// Offsets are preserved, so marks taken on `self` stay valid on the clone.
    pub fn try_clone_with(&mut self, extra_capacity: usize) -> ArenaResult<HeapArena> {
        let capacity = self
            .capacity()
            .checked_add(extra_capacity)
            .ok_or_else(|| ArenaError::size_overflow("arena clone capacity"))?;

        let mut clone = HeapArena::with_config(self.config.clone().with_max_capacity(capacity))?;

        let used = self.used();
        clone.buffer_mut()[..used].copy_from_slice(self.as_bytes());
        clone.size.set(used);
        clone.peak.set(used);

        #[cfg(feature = "logging")]
        debug!(used, capacity, "cloned arena");

        Ok(clone)
    }

    /// Copies the live bytes into a new heap arena of the same capacity
    pub fn try_clone(&mut self) -> ArenaResult<HeapArena> {
        self.try_clone_with(0)
    }

    /// Live bytes, `[0, used())`
    pub fn as_bytes(&mut self) -> &[u8] {
        let used = self.used();
        &self.buffer_mut()[..used]
    }

    /// Whole buffer, live and free
    fn buffer_mut(&mut self) -> &mut [u8] {
        // SAFETY: Creating a slice over the whole buffer.
        // - &mut self: no slice handed out by alloc is alive
        // - storage owns capacity() initialized bytes at as_ptr()
        unsafe { slice::from_raw_parts_mut(self.storage.as_ptr(), self.capacity()) }
    }

    fn discard(&mut self, from: usize, to: usize) {
        if let Some(pattern) = self.config.rewind_pattern {
            self.buffer_mut()[from..to].fill(pattern);
        }
    }

    /// Whether `region` lies inside the live part of this arena's buffer
    fn owns(&self, region: &[u8]) -> bool {
        let base = self.storage.as_ptr() as usize;
        let start = region.as_ptr() as usize;

        start >= base
            && (start - base)
                .checked_add(region.len())
                .is_some_and(|end| end <= self.used())
    }
}

impl<S: Storage> fmt::Debug for Arena<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("used", &self.used())
            .field("capacity", &self.capacity())
            .field("peak", &self.peak())
            .finish_non_exhaustive()
    }
}
