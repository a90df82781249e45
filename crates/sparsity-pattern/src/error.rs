//! Pattern error types.

use std::error::Error;
use std::fmt;

use sparsity_heap::HeapError;

/// Errors from building or querying a [`crate::SparsityPattern`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternError {
    /// Row index outside `[1, row_count]`.
    RowOutOfRange {
        /// The offending 1-based row.
        row: usize,
        /// Number of rows in the pattern.
        row_count: usize,
    },
    /// Column index outside `[1, col_count]`.
    ColumnOutOfRange {
        /// The offending 1-based column.
        col: usize,
        /// Number of columns in the pattern.
        col_count: usize,
    },
    /// `col_count` does not fit in the pattern's column index type.
    ColumnCountTooLarge {
        /// The requested column count.
        col_count: usize,
        /// Largest column count the index type can store.
        max: usize,
    },
    /// The backing heap rejected an operation.
    Heap(HeapError),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowOutOfRange { row, row_count } => {
                write!(f, "row {row} out of range [1, {row_count}]")
            }
            Self::ColumnOutOfRange { col, col_count } => {
                write!(f, "column {col} out of range [1, {col_count}]")
            }
            Self::ColumnCountTooLarge { col_count, max } => {
                write!(
                    f,
                    "column count {col_count} exceeds the index type maximum {max}"
                )
            }
            Self::Heap(err) => write!(f, "heap error: {err}"),
        }
    }
}

impl Error for PatternError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Heap(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HeapError> for PatternError {
    fn from(err: HeapError) -> Self {
        Self::Heap(err)
    }
}
