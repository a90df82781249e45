//! Growable lists of same-size pages.
//!
//! A [`Pool`] serves one size class. When every page is exhausted a new
//! page is appended; pages are never removed while the pool lives.

use tracing::debug;

use crate::error::HeapError;
use crate::handle::MemoryHandle;
use crate::page::Page;

/// All pages of a single size class, in creation order.
pub struct Pool {
    block_size: usize,
    page_bytes: usize,
    pages: Vec<Page>,
}

impl Pool {
    /// Create an empty pool. No page is allocated until the first request.
    ///
    /// # Errors
    ///
    /// [`HeapError::InvalidConfig`] if `block_size` is not a power of two or
    /// does not divide `page_bytes`.
    pub fn new(block_size: usize, page_bytes: usize) -> Result<Self, HeapError> {
        if !block_size.is_power_of_two() || page_bytes < block_size || page_bytes % block_size != 0
        {
            return Err(HeapError::InvalidConfig {
                reason: format!(
                    "{page_bytes}-byte pages cannot be split into {block_size}-byte blocks"
                ),
            });
        }
        Ok(Self {
            block_size,
            page_bytes,
            pages: Vec::new(),
        })
    }

    /// Allocate one block, adding a page if every existing page is full.
    ///
    /// Pages are scanned in creation order, so earlier pages are refilled
    /// before later ones.
    ///
    /// # Errors
    ///
    /// - [`HeapError::SizeClassMismatch`] if `size` is not this pool's block size.
    /// - [`HeapError::Exhausted`] if a new page was needed and the host
    ///   allocation failed.
    pub fn allocate(&mut self, size: usize) -> Result<MemoryHandle, HeapError> {
        if size != self.block_size {
            return Err(HeapError::SizeClassMismatch {
                expected: self.block_size,
                actual: size,
            });
        }

        for page in &mut self.pages {
            if let Some(handle) = page.allocate(size)? {
                return Ok(handle);
            }
        }

        let mut page = Page::new(self.page_bytes, self.block_size)?;
        let handle = page
            .allocate(size)?
            .expect("fresh page has at least one free block");
        self.pages.push(page);
        debug!(
            block_size = self.block_size,
            page_bytes = self.page_bytes,
            pages = self.pages.len(),
            "page added to pool"
        );
        Ok(handle)
    }

    /// Index of the page whose address range contains `address`.
    pub fn find_page(&self, address: usize) -> Option<usize> {
        self.pages.iter().position(|page| page.contains(address))
    }

    /// Page at the given index.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Mutable page at the given index.
    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// Block size served by this pool.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of pages allocated so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total bytes held in pages.
    pub fn memory_bytes(&self) -> usize {
        self.pages.iter().map(Page::memory_bytes).sum()
    }

    /// Blocks currently handed out across all pages.
    pub fn live_blocks(&self) -> usize {
        self.pages.iter().map(Page::live_count).sum()
    }

    /// Consume the pool, yielding its pages for release.
    pub(crate) fn into_pages(self) -> std::vec::IntoIter<Page> {
        self.pages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_allocation_creates_page() {
        let mut pool = Pool::new(16, 256).unwrap();
        assert_eq!(pool.page_count(), 0);
        let h = pool.allocate(16).unwrap();
        assert_eq!(pool.page_count(), 1);
        assert_eq!(h.byte_size(), 16);
        assert_eq!(pool.find_page(h.address()), Some(0));
    }

    #[test]
    fn pool_grows_on_exhaustion() {
        let mut pool = Pool::new(16, 32).unwrap();
        let _ = pool.allocate(16).unwrap();
        let _ = pool.allocate(16).unwrap();
        let third = pool.allocate(16).unwrap();
        assert_eq!(pool.page_count(), 2);
        assert_eq!(pool.find_page(third.address()), Some(1));
    }

    #[test]
    fn earlier_page_refilled_first() {
        let mut pool = Pool::new(16, 32).unwrap();
        let a = pool.allocate(16).unwrap();
        let _ = pool.allocate(16).unwrap();
        let _ = pool.allocate(16).unwrap(); // second page
        let a_addr = a.address();
        pool.page_mut(0).unwrap().release(a).unwrap();

        let reused = pool.allocate(16).unwrap();
        assert_eq!(reused.address(), a_addr);
        assert_eq!(pool.page_count(), 2);
    }

    #[test]
    fn wrong_size_is_mismatch() {
        let mut pool = Pool::new(16, 256).unwrap();
        assert_eq!(
            pool.allocate(32),
            Err(HeapError::SizeClassMismatch {
                expected: 16,
                actual: 32
            })
        );
        assert_eq!(pool.page_count(), 0);
    }

    #[test]
    fn indivisible_granularity_is_config_error() {
        assert!(matches!(
            Pool::new(64, 32),
            Err(HeapError::InvalidConfig { .. })
        ));
        assert!(matches!(
            Pool::new(24, 96),
            Err(HeapError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn accounting_tracks_pages_and_blocks() {
        let mut pool = Pool::new(8, 64).unwrap();
        for _ in 0..9 {
            let _ = pool.allocate(8).unwrap();
        }
        assert_eq!(pool.page_count(), 2);
        assert_eq!(pool.memory_bytes(), 128);
        assert_eq!(pool.live_blocks(), 9);
    }

    #[test]
    fn foreign_address_has_no_page() {
        let mut pool = Pool::new(8, 64).unwrap();
        let mut other = Pool::new(8, 64).unwrap();
        let _ = pool.allocate(8).unwrap();
        let foreign = other.allocate(8).unwrap();
        assert_eq!(pool.find_page(foreign.address()), None);
    }
}
