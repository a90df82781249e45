//! Dynamic sparsity patterns for incremental sparse-matrix construction.
//!
//! A [`SparsityPattern`] records, for every matrix row, the sorted and
//! de-duplicated list of columns holding structural non-zeros. Pairs may
//! arrive in any order and any multiplicity (typically from a mesh
//! traversal); each row's storage is a single heap block that doubles when
//! it fills up.
//!
//! ```text
//! SparsityPattern<I>
//! ├── Heap (owns every row block)
//! └── RowDescriptor × row_count  { MemoryHandle, len }
//!
//! RootedRowView<'a, I> ──borrows──▶ Heap + one row's first `len` elements
//! ```
//!
//! Rows and columns are 1-based. Column indices are stored as a
//! [`ColumnIndex`] type (`u32` by default).
//!
//! # Example
//!
//! ```rust
//! use sparsity_pattern::SparsityPattern;
//!
//! let mut pattern = SparsityPattern::with_capacity(3, 5, 2)?;
//! pattern.insert(1, 3)?;
//! pattern.insert(1, 1)?;
//! pattern.insert(1, 3)?;
//! assert_eq!(pattern.row_view(1)?.to_vec(), vec![1, 3]);
//! # Ok::<(), sparsity_pattern::PatternError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod error;
pub mod pattern;
mod row;
pub mod view;

pub use element::ColumnIndex;
pub use error::PatternError;
pub use pattern::SparsityPattern;
pub use view::{RootedRowView, RowIter, Rows};
