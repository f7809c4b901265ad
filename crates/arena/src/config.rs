//! Arena configuration

use crate::error::{ArenaError, ArenaResult};

/// Capacity used whenever an explicit one is not supplied (4 MiB)
///
/// Shared by [`StackArena`](crate::StackArena)'s default const parameter and
/// by [`ArenaConfig::default`].
pub const DEFAULT_CAPACITY: usize = 4 * 1024 * 1024;

/// Configuration for heap-resident arenas
///
/// Inline arenas take their capacity from the type parameter and only read
/// the fill patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Upper bound on cumulative allocation, in bytes
    pub max_capacity: usize,

    /// Fill patterns for debugging
    pub alloc_pattern: Option<u8>,
    pub rewind_pattern: Option<u8>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaConfig {
    /// Creates new config with default values
    pub const fn new() -> Self {
        Self {
            max_capacity: DEFAULT_CAPACITY,
            alloc_pattern: None,
            rewind_pattern: None,
        }
    }

    /// Small arena (64KB) for short-lived scratch work
    pub fn small() -> Self {
        Self::new().with_max_capacity(64 * 1024)
    }

    /// Medium arena (1MB)
    pub fn medium() -> Self {
        Self::new().with_max_capacity(1024 * 1024)
    }

    /// Large arena (16MB) for heavy workloads
    pub fn large() -> Self {
        Self::new().with_max_capacity(16 * 1024 * 1024)
    }

    /// Debug configuration - poisons fresh and discarded bytes
    pub fn debug() -> Self {
        Self {
            max_capacity: DEFAULT_CAPACITY,
            alloc_pattern: Some(0xCC),
            rewind_pattern: Some(0xDD),
        }
    }

    /// Sets the fixed capacity
    #[must_use = "builder methods must be chained or built"]
    pub const fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Fills every fresh allocation with `pattern`
    #[must_use = "builder methods must be chained or built"]
    pub fn with_alloc_pattern(mut self, pattern: u8) -> Self {
        self.alloc_pattern = Some(pattern);
        self
    }

    /// Overwrites bytes discarded by rewind/reset with `pattern`
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rewind_pattern(mut self, pattern: u8) -> Self {
        self.rewind_pattern = Some(pattern);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> ArenaResult<()> {
        if let (Some(alloc), Some(rewind)) = (self.alloc_pattern, self.rewind_pattern)
            && alloc == rewind
        {
            return Err(ArenaError::invalid_config(
                "alloc and rewind patterns must differ",
            ));
        }

        Ok(())
    }
}
