//! Sparsity: dynamic sparsity patterns for incremental sparse-matrix assembly.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! sub-crates. Adding `sparsity` as a single dependency is enough for most
//! users.
//!
//! # Quick start
//!
//! ```rust
//! use sparsity::prelude::*;
//!
//! // Two line elements sharing node 2.
//! let mut pattern = SparsityPattern::new(3, 3)?;
//! for nodes in [[1, 2], [2, 3]] {
//!     for &a in &nodes {
//!         for &b in &nodes {
//!             pattern.insert(a, b)?;
//!         }
//!     }
//! }
//!
//! let middle: RootedRowView<'_> = pattern.row_view(2)?;
//! assert_eq!(middle.to_vec(), vec![1, 2, 3]);
//! assert_eq!(pattern.nnz(), 7);
//! # Ok::<(), PatternError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`heap`] | `sparsity-heap` | Size-classed block heap, handles, stats |
//! | [`pattern`] | `sparsity-pattern` | `SparsityPattern`, row views, column index types |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Size-classed block heap (`sparsity-heap`).
///
/// [`heap::Heap`] hands out [`heap::MemoryHandle`]s for power-of-two
/// blocks carved from fixed-size pages.
pub use sparsity_heap as heap;

/// Sparsity patterns and row views (`sparsity-pattern`).
pub use sparsity_pattern as pattern;

/// Common imports for typical usage.
///
/// ```rust
/// use sparsity::prelude::*;
/// ```
pub mod prelude {
    // Heap
    pub use sparsity_heap::{
        Heap, HeapConfig, HeapError, HeapStats, MemoryHandle, TeardownReport,
    };

    // Pattern
    pub use sparsity_pattern::{ColumnIndex, PatternError, RootedRowView, SparsityPattern};
}
