//! # linear-arena
//!
//! Linear ("bump") arena: sequential regions handed out from one contiguous
//! buffer of fixed capacity, released in bulk by rewinding or resetting a
//! single cursor.
//!
//! ```text
//!   ┌─────┬─────┬─────┬─────┬───────────────────────────────────────┐
//!   │ A1  │ A2  │ A3  │ A4  │            free                       │
//!   └─────┴─────┴─────┴─────┴───────────────────────────────────────┘
//!   0     ▲                 ▲                                  capacity
//!         │                 └── cursor (size)
//!         └── mark: rewinding here discards A2..A4
//! ```
//!
//! - [`StackArena<N>`]: buffer embedded in the value, capacity fixed at
//!   compile time (default [`DEFAULT_CAPACITY`])
//! - [`HeapArena`]: buffer on the heap, capacity chosen through
//!   [`ArenaConfig`], released on drop
//!
//! Both are the same [`Arena`] type over different [`Storage`]; every
//! operation exists once.
//!
//! ## Quick Start
//!
//! ```rust
//! use linear_arena::{ArenaError, HeapArena};
//!
//! fn main() -> Result<(), ArenaError> {
//!     let mut arena = HeapArena::with_capacity(64)?;
//!
//!     let header = arena.alloc_copy(b"GET ")?;
//!     assert_eq!(header.len(), 4);
//!
//!     let mark = arena.snapshot();
//!     arena.alloc(20)?;
//!     arena.rewind(mark)?;
//!     assert_eq!(arena.used(), 4);
//!
//!     assert!(matches!(
//!         arena.alloc(61),
//!         Err(ArenaError::CapacityExceeded { .. })
//!     ));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `logging` (default): structured events through `tracing`
//!
//! ## Limitations
//!
//! - No individual deallocation, compaction or growth of a full arena
//!   (clone it into a larger one with [`Arena::try_clone_with`])
//! - No alignment guarantee beyond one byte
//! - Single-threaded: arenas are `Send` but not `Sync`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rust_2018_idioms)]
// Storage and allocation are built on raw buffers
#![allow(unsafe_code)]
// Allocation hands out disjoint `&mut [u8]` ranges from `&self`
#![allow(clippy::mut_from_ref)]

pub mod arena;
pub mod config;
pub mod error;
pub mod storage;

pub use crate::arena::{Arena, ArenaScope, HeapArena, Mark, StackArena};
pub use crate::config::{ArenaConfig, DEFAULT_CAPACITY};
pub use crate::error::{ArenaError, ArenaResult};
pub use crate::storage::{HeapStorage, InlineStorage, Storage};

pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::arena::{Arena, ArenaScope, HeapArena, Mark, StackArena};
    pub use crate::config::{ArenaConfig, DEFAULT_CAPACITY};
    pub use crate::error::{ArenaError, ArenaResult};
}
