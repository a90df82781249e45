//! Size-classed block heap for incremental sparse-matrix construction.
//!
//! Replaces millions of small host-allocator calls with a handful of large
//! page allocations carved into power-of-two blocks. Every block handed out
//! is identified by a [`MemoryHandle`] carrying its address and block size.
//!
//! # Architecture
//!
//! ```text
//! Heap (owner, unit of allocation lifetime)
//! └── Pool × size class (block size 4, 8, 16, ... bytes)
//!     └── Page[] (one 4MB host allocation each)
//!         ├── bump cursor over never-used blocks
//!         └── intrusive free list threaded through released blocks
//! ```
//!
//! # Free list
//!
//! Released blocks store the page-relative offset of the next free block in
//! their first four bytes. Reuse is LIFO: the most recently released block
//! is the next one handed out. All of this is expressed with safe byte
//! copies; the crate contains no `unsafe` code.
//!
//! # Teardown
//!
//! Pages are never returned to the host while the heap is alive. Dropping
//! the heap (or calling [`Heap::teardown`]) releases every page exactly
//! once and reports a [`TeardownReport`] through the optional hook.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
pub mod heap;
pub mod page;
pub mod pool;
pub mod report;

// Public re-exports for the primary API surface.
pub use config::HeapConfig;
pub use error::HeapError;
pub use handle::MemoryHandle;
pub use heap::{Heap, PageLocation};
pub use report::{HeapStats, TeardownReport};
