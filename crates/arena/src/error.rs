//! Standalone error types for linear-arena
//!
//! Uses thiserror for clean, idiomatic Rust error definitions.

use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::{error, warn};

// ============================================================================
// Main Error Types
// ============================================================================

/// Arena errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    // --- Allocation Errors ---
    #[error(
        "Arena exceeded capacity: requested {requested} bytes with {used} of {capacity} bytes used"
    )]
    CapacityExceeded {
        requested: usize,
        used: usize,
        capacity: usize,
    },

    #[error("Out of memory: failed to reserve {size} bytes of arena storage")]
    OutOfMemory { size: usize },

    #[error("Size overflow during operation: {operation}")]
    SizeOverflow { operation: &'static str },

    // --- Rewind Errors ---
    #[error("Invalid mark: offset {mark} is ahead of the arena cursor at {size}")]
    InvalidMark { mark: usize, size: usize },

    #[error("Invalid mark: offset {mark} precedes the scope start at {start}")]
    MarkBeforeScope { mark: usize, start: usize },

    // --- Reallocation Errors ---
    #[error("Region at {addr:#x} ({len} bytes) was not allocated by this arena")]
    ForeignRegion { addr: usize, len: usize },

    // --- Configuration Errors ---
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ArenaError {
    /// Check if error is retryable
    ///
    /// Only storage exhaustion in the global allocator may go away on its own;
    /// every other variant is a contract violation by the caller.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "ARENA:ALLOC:CAPACITY",
            Self::OutOfMemory { .. } => "ARENA:ALLOC:OOM",
            Self::SizeOverflow { .. } => "ARENA:ALLOC:OVERFLOW",
            Self::InvalidMark { .. } => "ARENA:REWIND:MARK",
            Self::MarkBeforeScope { .. } => "ARENA:REWIND:SCOPE",
            Self::ForeignRegion { .. } => "ARENA:REALLOC:FOREIGN",
            Self::InvalidConfig { .. } => "ARENA:CONFIG:INVALID",
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create capacity exceeded error
    pub fn capacity_exceeded(requested: usize, used: usize, capacity: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(requested, used, capacity, "arena exceeded capacity");

        Self::CapacityExceeded {
            requested,
            used,
            capacity,
        }
    }

    /// Create out of memory error
    pub fn out_of_memory(size: usize) -> Self {
        #[cfg(feature = "logging")]
        error!(size, "failed to allocate arena storage");

        Self::OutOfMemory { size }
    }

    /// Create size overflow error
    pub fn size_overflow(operation: &'static str) -> Self {
        Self::SizeOverflow { operation }
    }

    /// Create invalid mark error
    pub fn invalid_mark(mark: usize, size: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(mark, size, "refusing to rewind arena forward");

        Self::InvalidMark { mark, size }
    }

    /// Create mark before scope error
    pub fn mark_before_scope(mark: usize, start: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(mark, start, "refusing to rewind past scope start");

        Self::MarkBeforeScope { mark, start }
    }

    /// Create foreign region error
    pub fn foreign_region(addr: usize, len: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(addr, len, "region does not belong to this arena");

        Self::ForeignRegion { addr, len }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for arena operations
pub type ArenaResult<T> = Result<T, ArenaError>;

// ============================================================================
// Tests
// ============================================================================
