//! Heap configuration parameters.

use crate::error::HeapError;

/// Configuration for the block heap.
///
/// Controls page granularity and the smallest size class. Validated when
/// the heap is constructed; all values are immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapConfig {
    /// Size of each page (one host allocation) in bytes.
    ///
    /// Default: 4_194_304 (4MB). Must be a power of two, at least
    /// `min_block_bytes`, and fit in a `u32` because free-list links are
    /// stored as 32-bit page offsets.
    pub page_bytes: usize,

    /// Smallest block size handed out, in bytes.
    ///
    /// Default: 4. Must be a power of two and at least 4, since a released
    /// block has to hold its free-list link. Requests smaller than this
    /// (including zero-byte requests) are served from this class.
    pub min_block_bytes: usize,
}

impl HeapConfig {
    /// Default page size: 4MB.
    pub const DEFAULT_PAGE_BYTES: usize = 4 * 1024 * 1024;

    /// Default minimum block size: one free-list link.
    pub const DEFAULT_MIN_BLOCK_BYTES: usize = 4;

    /// Width of a free-list link stored inside a released block.
    pub const LINK_BYTES: usize = std::mem::size_of::<u32>();

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            page_bytes: Self::DEFAULT_PAGE_BYTES,
            min_block_bytes: Self::DEFAULT_MIN_BLOCK_BYTES,
        }
    }

    /// Override the page size.
    pub fn with_page_bytes(mut self, page_bytes: usize) -> Self {
        self.page_bytes = page_bytes;
        self
    }

    /// Override the minimum block size.
    pub fn with_min_block_bytes(mut self, min_block_bytes: usize) -> Self {
        self.min_block_bytes = min_block_bytes;
        self
    }

    /// Check every constraint documented on the fields.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidConfig`] describing the first violated
    /// constraint.
    pub fn validate(&self) -> Result<(), HeapError> {
        if !self.min_block_bytes.is_power_of_two() || self.min_block_bytes < Self::LINK_BYTES {
            return Err(HeapError::InvalidConfig {
                reason: format!(
                    "min_block_bytes must be a power of two >= {}, got {}",
                    Self::LINK_BYTES,
                    self.min_block_bytes
                ),
            });
        }
        if !self.page_bytes.is_power_of_two() || self.page_bytes < self.min_block_bytes {
            return Err(HeapError::InvalidConfig {
                reason: format!(
                    "page_bytes must be a power of two >= min_block_bytes ({}), got {}",
                    self.min_block_bytes, self.page_bytes
                ),
            });
        }
        if u32::try_from(self.page_bytes).is_err() {
            return Err(HeapError::InvalidConfig {
                reason: format!("page_bytes must fit in u32, got {}", self.page_bytes),
            });
        }
        Ok(())
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new()
    }
}
