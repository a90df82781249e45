//! Borrowed, read-only views over pattern rows.
//!
//! [`RootedRowView`] borrows the pattern's [`Heap`] for its whole lifetime.
//! That borrow is the rooting: while any view is alive the heap can be
//! neither torn down nor mutated, so the view can never dangle or observe
//! a half-finished insertion.

use std::fmt;
use std::iter::FusedIterator;
use std::slice::ChunksExact;

use sparsity_heap::Heap;

use crate::element::ColumnIndex;
use crate::pattern::SparsityPattern;
use crate::row::RowSlice;

/// Read-only view of one row's sorted column indices.
///
/// Holds a reference to the owning heap plus the row's first `len`
/// elements. Every access is bounds-checked.
#[derive(Clone, Copy)]
pub struct RootedRowView<'a, I: ColumnIndex = u32> {
    heap: &'a Heap,
    row: usize,
    columns: RowSlice<'a, I>,
}

impl<'a, I: ColumnIndex> RootedRowView<'a, I> {
    pub(crate) fn new(heap: &'a Heap, row: usize, columns: RowSlice<'a, I>) -> Self {
        Self { heap, row, columns }
    }

    /// The heap this view is rooted in.
    pub fn heap(&self) -> &'a Heap {
        self.heap
    }

    /// The 1-based row this view covers.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.len() == 0
    }

    /// Column at position `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<I> {
        self.columns.get(index)
    }

    /// Smallest column in the row.
    pub fn first(&self) -> Option<I> {
        self.columns.get(0)
    }

    /// Largest column in the row.
    pub fn last(&self) -> Option<I> {
        self.len().checked_sub(1).and_then(|i| self.columns.get(i))
    }

    /// Whether `col` is present, by binary search.
    pub fn contains(&self, col: usize) -> bool {
        I::from_index(col).is_some_and(|value| self.columns.binary_search(value).is_ok())
    }

    /// Iterate the columns in ascending order.
    pub fn iter(&self) -> RowIter<'a, I> {
        RowIter::new(self.columns.bytes())
    }

    /// Copy the columns into a `Vec`.
    pub fn to_vec(&self) -> Vec<I> {
        self.iter().collect()
    }
}

impl<I: ColumnIndex> fmt::Debug for RootedRowView<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootedRowView")
            .field("row", &self.row)
            .field("columns", &self.to_vec())
            .finish()
    }
}

impl<'a, I: ColumnIndex> IntoIterator for RootedRowView<'a, I> {
    type Item = I;
    type IntoIter = RowIter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, I: ColumnIndex> IntoIterator for &RootedRowView<'a, I> {
    type Item = I;
    type IntoIter = RowIter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over one row's columns.
#[derive(Clone)]
pub struct RowIter<'a, I> {
    chunks: ChunksExact<'a, u8>,
    _index: std::marker::PhantomData<I>,
}

impl<'a, I: ColumnIndex> RowIter<'a, I> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            chunks: bytes.chunks_exact(I::SIZE),
            _index: std::marker::PhantomData,
        }
    }
}

impl<I: ColumnIndex> Iterator for RowIter<'_, I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        self.chunks.next().map(I::read_le)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<I: ColumnIndex> DoubleEndedIterator for RowIter<'_, I> {
    fn next_back(&mut self) -> Option<I> {
        self.chunks.next_back().map(I::read_le)
    }
}

impl<I: ColumnIndex> ExactSizeIterator for RowIter<'_, I> {}

impl<I: ColumnIndex> FusedIterator for RowIter<'_, I> {}

/// Lazy iterator over every row of a pattern, in ascending row order.
///
/// A clone continues independently from the same position. Call
/// [`SparsityPattern::rows`] again to start over from row 1.
#[derive(Clone)]
pub struct Rows<'a, I: ColumnIndex = u32> {
    pattern: &'a SparsityPattern<I>,
    /// Next 1-based row to yield.
    next: usize,
}

impl<'a, I: ColumnIndex> Rows<'a, I> {
    pub(crate) fn new(pattern: &'a SparsityPattern<I>) -> Self {
        Self { pattern, next: 1 }
    }
}

impl<'a, I: ColumnIndex> Iterator for Rows<'a, I> {
    type Item = RootedRowView<'a, I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.pattern.row_count() {
            return None;
        }
        let view = self.pattern.view_unchecked(self.next);
        self.next += 1;
        Some(view)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.pattern.row_count() + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<I: ColumnIndex> ExactSizeIterator for Rows<'_, I> {}

impl<I: ColumnIndex> FusedIterator for Rows<'_, I> {}

impl<'a, I: ColumnIndex> IntoIterator for &'a SparsityPattern<I> {
    type Item = RootedRowView<'a, I>;
    type IntoIter = Rows<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}
