//! Typed access to the bytes of one row block.

use std::marker::PhantomData;

use sparsity_heap::MemoryHandle;

use crate::element::ColumnIndex;

/// Per-row bookkeeping: the row's heap block and how many columns it holds.
///
/// Invariant: `len <= capacity::<I>()`, and the first `len` elements of the
/// block are strictly increasing.
pub(crate) struct RowDescriptor {
    pub(crate) handle: MemoryHandle,
    pub(crate) len: usize,
}

impl RowDescriptor {
    pub(crate) fn new(handle: MemoryHandle) -> Self {
        Self { handle, len: 0 }
    }

    /// Number of elements the block can hold.
    pub(crate) fn capacity<I: ColumnIndex>(&self) -> usize {
        self.handle.byte_size() / I::SIZE
    }
}

/// Bounds-checked, typed view over the first `len` elements of a row block.
#[derive(Clone, Copy)]
pub(crate) struct RowSlice<'a, I> {
    bytes: &'a [u8],
    _index: PhantomData<I>,
}

impl<'a, I: ColumnIndex> RowSlice<'a, I> {
    /// Wrap a block, keeping only its first `len` elements.
    ///
    /// # Panics
    ///
    /// Panics if the block is shorter than `len` elements.
    pub(crate) fn new(block: &'a [u8], len: usize) -> Self {
        Self {
            bytes: &block[..len * I::SIZE],
            _index: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len() / I::SIZE
    }

    pub(crate) fn get(&self, index: usize) -> Option<I> {
        let start = index.checked_mul(I::SIZE)?;
        let end = start.checked_add(I::SIZE)?;
        self.bytes.get(start..end).map(I::read_le)
    }

    pub(crate) fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Binary search for `value`.
    ///
    /// `Ok(k)` if found at `k`; `Err(k)` with the smallest `k` whose element
    /// is greater than `value` otherwise.
    pub(crate) fn binary_search(&self, value: I) -> Result<usize, usize> {
        let (mut lo, mut hi) = (0, self.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.get(mid) {
                Some(found) if found < value => lo = mid + 1,
                Some(found) if found == value => return Ok(mid),
                _ => hi = mid,
            }
        }
        Err(lo)
    }
}

/// Open a gap at `k` in the first `len` elements of `block` and write
/// `value` into it.
///
/// # Panics
///
/// Panics if the block cannot hold `len + 1` elements or `k > len`.
pub(crate) fn insert_at<I: ColumnIndex>(block: &mut [u8], len: usize, k: usize, value: I) {
    assert!(k <= len, "insertion point {k} past row length {len}");
    let at = k * I::SIZE;
    let end = len * I::SIZE;
    block.copy_within(at..end, at + I::SIZE);
    value.write_le(&mut block[at..at + I::SIZE]);
}
