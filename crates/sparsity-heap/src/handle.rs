//! Memory handles.
//!
//! A [`MemoryHandle`] names one block inside a [`crate::Heap`]: its absolute
//! address plus the block size of the size class it was drawn from.

use std::fmt;

/// Address and size of an allocated block.
///
/// `byte_size` is always the power-of-two block size of the size class,
/// never the size the caller asked for. Callers that need a logical length
/// track it themselves.
///
/// Handles are `Clone` but not `Copy`: [`crate::Heap::free`] and
/// [`crate::Heap::grow`] both consume their handle, so stale handles only
/// survive through an explicit `clone()`. A stale handle passed back to the
/// heap is rejected with [`crate::HeapError::NotOwned`] until its block is
/// handed out again.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct MemoryHandle {
    /// Absolute address of the first byte of the block.
    pub(crate) address: usize,
    /// Block size in bytes.
    pub(crate) byte_size: usize,
}

impl MemoryHandle {
    /// Create a new handle.
    pub(crate) fn new(address: usize, byte_size: usize) -> Self {
        Self { address, byte_size }
    }

    /// Absolute address of the block.
    pub fn address(&self) -> usize {
        self.address
    }

    /// Block size in bytes.
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Size class index: the bit position of the block size.
    ///
    /// Class 2 is 4-byte blocks, class 3 is 8-byte blocks, and so on.
    pub fn size_class(&self) -> u32 {
        self.byte_size.trailing_zeros()
    }

    /// Whether two handles come from the same size class.
    pub fn is_compatible(&self, other: &MemoryHandle) -> bool {
        self.byte_size == other.byte_size
    }
}

impl fmt::Display for MemoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemoryHandle(0x{:x}, {} bytes)",
            self.address, self.byte_size
        )
    }
}
