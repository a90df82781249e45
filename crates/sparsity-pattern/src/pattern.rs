//! The growable sparse-row pattern.
//!
//! Each row is one heap block holding a sorted, duplicate-free run of
//! column indices followed by unused capacity. Insertion binary-searches
//! the run, and when the block is full doubles it through
//! [`Heap::grow`] before shifting the tail to open a gap.

use std::marker::PhantomData;

use sparsity_heap::{Heap, HeapConfig, HeapStats};
use tracing::trace;

use crate::element::ColumnIndex;
use crate::error::PatternError;
use crate::row::{insert_at, RowDescriptor, RowSlice};
use crate::view::{RootedRowView, Rows};

/// Per-row sorted column lists backed by a single [`Heap`].
///
/// Rows and columns are 1-based. The pattern and its heap are dropped as a
/// unit; no row is ever freed individually.
pub struct SparsityPattern<I: ColumnIndex = u32> {
    row_count: usize,
    col_count: usize,
    heap: Heap,
    rows: Vec<RowDescriptor>,
    _index: PhantomData<I>,
}

impl SparsityPattern<u32> {
    /// Default number of columns reserved per row.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

    /// Create an empty pattern with room for 8 columns per row.
    ///
    /// # Errors
    ///
    /// See [`SparsityPattern::with_heap_config`].
    pub fn new(row_count: usize, col_count: usize) -> Result<Self, PatternError> {
        Self::with_capacity(row_count, col_count, Self::DEFAULT_INITIAL_CAPACITY)
    }

    /// Create an empty pattern with room for `initial_capacity` columns per row.
    ///
    /// # Errors
    ///
    /// See [`SparsityPattern::with_heap_config`].
    pub fn with_capacity(
        row_count: usize,
        col_count: usize,
        initial_capacity: usize,
    ) -> Result<Self, PatternError> {
        Self::with_heap_config(row_count, col_count, initial_capacity, HeapConfig::default())
    }
}

impl<I: ColumnIndex> SparsityPattern<I> {
    /// Create an empty pattern with an explicit heap configuration.
    ///
    /// Every row receives a block of `initial_capacity * I::SIZE` bytes,
    /// rounded up to its size class, so a row's real capacity may exceed
    /// `initial_capacity`. A capacity of zero is treated as one.
    ///
    /// For a non-default index type, name it explicitly:
    /// `SparsityPattern::<u64>::with_heap_config(..)`.
    ///
    /// # Errors
    ///
    /// - [`PatternError::ColumnCountTooLarge`] if `col_count` does not fit in `I`.
    /// - [`PatternError::Heap`] if the config is invalid, the initial block
    ///   exceeds the page size, or a page allocation fails.
    pub fn with_heap_config(
        row_count: usize,
        col_count: usize,
        initial_capacity: usize,
        config: HeapConfig,
    ) -> Result<Self, PatternError> {
        if I::from_index(col_count).is_none() {
            return Err(PatternError::ColumnCountTooLarge {
                col_count,
                max: I::max_index(),
            });
        }

        let mut heap = Heap::with_config(config)?;
        let block_bytes = initial_capacity.max(1).saturating_mul(I::SIZE);
        let mut rows = Vec::with_capacity(row_count);
        for _ in 0..row_count {
            rows.push(RowDescriptor::new(heap.allocate(block_bytes)?));
        }

        Ok(Self {
            row_count,
            col_count,
            heap,
            rows,
            _index: PhantomData,
        })
    }

    /// Record a structural non-zero at `(row, col)`.
    ///
    /// Returns `Ok(true)` if the column was new to the row and `Ok(false)`
    /// if it was already present. When the row's block is full it is grown
    /// to exactly twice its size first.
    ///
    /// On error the pattern is unchanged.
    ///
    /// # Errors
    ///
    /// - [`PatternError::RowOutOfRange`] / [`PatternError::ColumnOutOfRange`]
    ///   for indices outside `[1, row_count]` / `[1, col_count]`.
    /// - [`PatternError::Heap`] if growing the row failed.
    pub fn insert(&mut self, row: usize, col: usize) -> Result<bool, PatternError> {
        let index = self.check_row(row)?;
        let value = self.check_col(col)?;

        let descriptor = &mut self.rows[index];
        let block = self.heap.bytes(&descriptor.handle)?;
        let k = match RowSlice::<I>::new(block, descriptor.len).binary_search(value) {
            Ok(_) => return Ok(false),
            Err(k) => k,
        };

        if descriptor.len == descriptor.capacity::<I>() {
            let doubled = descriptor.handle.byte_size() * 2;
            // The row keeps its current handle if growth fails.
            descriptor.handle = self.heap.grow(descriptor.handle.clone(), doubled)?;
            trace!(row, capacity = descriptor.capacity::<I>(), "row block grown");
        }

        let block = self.heap.bytes_mut(&descriptor.handle)?;
        insert_at(block, descriptor.len, k, value);
        descriptor.len += 1;
        Ok(true)
    }

    /// Insert every `(row, col)` pair from `pairs`, in order.
    ///
    /// Returns the number of pairs that were new. Stops at the first error;
    /// pairs before it stay inserted.
    ///
    /// # Errors
    ///
    /// Any error from [`SparsityPattern::insert`].
    pub fn insert_all<P>(&mut self, pairs: P) -> Result<usize, PatternError>
    where
        P: IntoIterator<Item = (usize, usize)>,
    {
        let mut added = 0;
        for (row, col) in pairs {
            if self.insert(row, col)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Read-only view of one row's columns.
    ///
    /// # Errors
    ///
    /// [`PatternError::RowOutOfRange`] if `row` is outside `[1, row_count]`.
    pub fn row_view(&self, row: usize) -> Result<RootedRowView<'_, I>, PatternError> {
        let index = self.check_row(row)?;
        let descriptor = &self.rows[index];
        let block = self.heap.bytes(&descriptor.handle)?;
        Ok(RootedRowView::new(
            &self.heap,
            row,
            RowSlice::new(block, descriptor.len),
        ))
    }

    /// Views of every row, in ascending row order.
    pub fn rows(&self) -> Rows<'_, I> {
        Rows::new(self)
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn col_count(&self) -> usize {
        self.col_count
    }

    /// Number of columns stored in `row`.
    ///
    /// # Errors
    ///
    /// [`PatternError::RowOutOfRange`] if `row` is outside `[1, row_count]`.
    pub fn row_len(&self, row: usize) -> Result<usize, PatternError> {
        let index = self.check_row(row)?;
        Ok(self.rows[index].len)
    }

    /// Number of columns `row` can hold before its block must grow.
    ///
    /// # Errors
    ///
    /// [`PatternError::RowOutOfRange`] if `row` is outside `[1, row_count]`.
    pub fn row_capacity(&self, row: usize) -> Result<usize, PatternError> {
        let index = self.check_row(row)?;
        Ok(self.rows[index].capacity::<I>())
    }

    /// Total number of stored entries across all rows.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.len).sum()
    }

    /// Usage summary of the backing heap.
    pub fn heap_stats(&self) -> HeapStats {
        self.heap.stats()
    }

    /// The backing heap.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// View of a row already known to be in range.
    pub(crate) fn view_unchecked(&self, row: usize) -> RootedRowView<'_, I> {
        let descriptor = &self.rows[row - 1];
        let block = self
            .heap
            .bytes(&descriptor.handle)
            .expect("row blocks are owned by the pattern's heap");
        RootedRowView::new(&self.heap, row, RowSlice::new(block, descriptor.len))
    }

    fn check_row(&self, row: usize) -> Result<usize, PatternError> {
        if row == 0 || row > self.row_count {
            return Err(PatternError::RowOutOfRange {
                row,
                row_count: self.row_count,
            });
        }
        Ok(row - 1)
    }

    fn check_col(&self, col: usize) -> Result<I, PatternError> {
        let out_of_range = || PatternError::ColumnOutOfRange {
            col,
            col_count: self.col_count,
        };
        if col == 0 || col > self.col_count {
            return Err(out_of_range());
        }
        I::from_index(col).ok_or_else(out_of_range)
    }
}
