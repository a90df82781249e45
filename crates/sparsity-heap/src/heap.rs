//! Size-classed heap: the top-level allocator.
//!
//! [`Heap`] rounds every request up to a power-of-two block size and
//! delegates to the [`Pool`] for that size class, creating pools lazily.
//! It owns every pool and page and releases them all, exactly once, when
//! it is torn down.

use std::fmt;
use std::time::Instant;

use smallvec::SmallVec;
use tracing::debug;

use crate::config::HeapConfig;
use crate::error::HeapError;
use crate::handle::MemoryHandle;
use crate::page::Page;
use crate::pool::Pool;
use crate::report::{HeapStats, TeardownReport};

/// Callback invoked once with the teardown summary.
type TeardownHook = Box<dyn FnMut(&TeardownReport) + Send>;

/// Where a handle lives inside a heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLocation {
    /// Size class index (bit position of the block size).
    pub size_class: u32,
    /// Index of the page within the size class's pool.
    pub page_index: usize,
}

/// A collection of size-class pools sharing one lifetime.
///
/// Pools are indexed directly by size class; classes below the configured
/// minimum block size are never populated.
///
/// # Lifetime
///
/// Handles borrow nothing from the heap, so the borrow checker cannot stop
/// a caller from keeping a handle past teardown. Owners that expose block
/// contents (such as a sparsity pattern's row views) do so through
/// references tied to the heap instead.
pub struct Heap {
    config: HeapConfig,
    /// `pools[c]` serves blocks of `1 << c` bytes.
    pools: SmallVec<[Option<Pool>; 8]>,
    allocations: u64,
    frees: u64,
    grows: u64,
    teardown_hook: Option<TeardownHook>,
    released: bool,
}

impl Heap {
    /// Create a heap with the default configuration (4MB pages, 4-byte
    /// minimum block).
    pub fn new() -> Self {
        Self::from_valid_config(HeapConfig::default())
    }

    /// Create a heap with a custom configuration.
    ///
    /// # Errors
    ///
    /// [`HeapError::InvalidConfig`] if the config fails validation.
    pub fn with_config(config: HeapConfig) -> Result<Self, HeapError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: HeapConfig) -> Self {
        Self {
            config,
            pools: SmallVec::new(),
            allocations: 0,
            frees: 0,
            grows: 0,
            teardown_hook: None,
            released: false,
        }
    }

    /// Register a callback that receives the [`TeardownReport`].
    ///
    /// Replaces any previously registered hook.
    pub fn set_teardown_hook(&mut self, hook: impl FnMut(&TeardownReport) + Send + 'static) {
        self.teardown_hook = Some(Box::new(hook));
    }

    /// The configuration this heap was built with.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Block size that a request of `requested` bytes is rounded up to.
    ///
    /// # Errors
    ///
    /// [`HeapError::InvalidConfig`] if the rounded size exceeds the page
    /// granularity, since no page could hold the block.
    pub fn block_size_for(&self, requested: usize) -> Result<usize, HeapError> {
        let too_large = || HeapError::InvalidConfig {
            reason: format!(
                "request of {requested} bytes exceeds the {}-byte page size",
                self.config.page_bytes
            ),
        };
        let block_size = requested
            .max(self.config.min_block_bytes)
            .checked_next_power_of_two()
            .ok_or_else(too_large)?;
        if block_size > self.config.page_bytes {
            return Err(too_large());
        }
        Ok(block_size)
    }

    /// Allocate a block of at least `requested` bytes.
    ///
    /// The returned handle's `byte_size` is the rounded-up block size, not
    /// `requested`. Block contents are unspecified.
    ///
    /// # Errors
    ///
    /// - [`HeapError::InvalidConfig`] if the request exceeds the page size.
    /// - [`HeapError::Exhausted`] if a new page could not be allocated.
    pub fn allocate(&mut self, requested: usize) -> Result<MemoryHandle, HeapError> {
        let block_size = self.block_size_for(requested)?;
        let class = block_size.trailing_zeros() as usize;
        if self.pools.len() <= class {
            self.pools.resize_with(class + 1, || None);
        }

        let pool = match &mut self.pools[class] {
            Some(pool) => pool,
            slot => slot.insert(Pool::new(block_size, self.config.page_bytes)?),
        };
        let handle = pool.allocate(block_size)?;
        self.allocations += 1;
        Ok(handle)
    }

    /// Locate the page that owns `handle`.
    ///
    /// # Errors
    ///
    /// [`HeapError::NotOwned`] if the handle's size has no pool in this heap
    /// or its address lies outside every page of that pool.
    pub fn find_owning_page(&self, handle: &MemoryHandle) -> Result<PageLocation, HeapError> {
        let not_owned = || HeapError::NotOwned {
            address: handle.address(),
            byte_size: handle.byte_size(),
        };
        if !handle.byte_size().is_power_of_two() {
            return Err(not_owned());
        }

        let size_class = handle.size_class();
        let pool = self
            .pools
            .get(size_class as usize)
            .and_then(Option::as_ref)
            .ok_or_else(not_owned)?;
        let page_index = pool.find_page(handle.address()).ok_or_else(not_owned)?;
        Ok(PageLocation {
            size_class,
            page_index,
        })
    }

    /// Return a block to its page.
    ///
    /// # Errors
    ///
    /// [`HeapError::NotOwned`] if the handle does not belong to this heap.
    pub fn free(&mut self, handle: MemoryHandle) -> Result<(), HeapError> {
        let location = self.find_owning_page(&handle)?;
        self.page_mut(location, &handle)?.release(handle)?;
        self.frees += 1;
        Ok(())
    }

    /// Move a block into a larger size class.
    ///
    /// Allocates a block for `new_size`, copies all `handle.byte_size()`
    /// bytes across, and releases the old block. The handle is consumed.
    /// On error nothing has been released and the old block is still live;
    /// a caller that must keep using it after a failure passes a clone.
    ///
    /// # Errors
    ///
    /// - [`HeapError::ShrinkUnsupported`] if `new_size <= handle.byte_size()`.
    /// - [`HeapError::NotOwned`] if the handle does not belong to this heap.
    /// - Any error from [`Heap::allocate`].
    pub fn grow(
        &mut self,
        handle: MemoryHandle,
        new_size: usize,
    ) -> Result<MemoryHandle, HeapError> {
        if new_size <= handle.byte_size() {
            return Err(HeapError::ShrinkUnsupported {
                current: handle.byte_size(),
                requested: new_size,
            });
        }
        let old_location = self.find_owning_page(&handle)?;
        self.page(old_location, &handle)?.bytes(&handle)?;

        let grown = self.allocate(new_size)?;
        let new_location = self.find_owning_page(&grown)?;
        self.copy_block(&handle, old_location, &grown, new_location)?;
        self.page_mut(old_location, &handle)?.release(handle)?;
        self.grows += 1;
        Ok(grown)
    }

    /// Contents of a live block.
    ///
    /// # Errors
    ///
    /// [`HeapError::NotOwned`] if the handle does not belong to this heap.
    pub fn bytes(&self, handle: &MemoryHandle) -> Result<&[u8], HeapError> {
        let location = self.find_owning_page(handle)?;
        self.page(location, handle)?.bytes(handle)
    }

    /// Mutable contents of a live block.
    ///
    /// # Errors
    ///
    /// [`HeapError::NotOwned`] if the handle does not belong to this heap.
    pub fn bytes_mut(&mut self, handle: &MemoryHandle) -> Result<&mut [u8], HeapError> {
        let location = self.find_owning_page(handle)?;
        self.page_mut(location, handle)?.bytes_mut(handle)
    }

    /// Current usage summary.
    pub fn stats(&self) -> HeapStats {
        let mut stats = HeapStats {
            allocations: self.allocations,
            frees: self.frees,
            grows: self.grows,
            ..HeapStats::default()
        };
        for pool in self.pools.iter().flatten() {
            stats.pool_count += 1;
            stats.page_count += pool.page_count();
            stats.memory_bytes += pool.memory_bytes();
            stats.live_blocks += pool.live_blocks();
        }
        stats
    }

    /// Release every page now and return the teardown summary.
    ///
    /// Equivalent to dropping the heap, except the report is also returned
    /// to the caller. The hook, if any, still runs.
    pub fn teardown(mut self) -> TeardownReport {
        self.release_all()
    }

    fn release_all(&mut self) -> TeardownReport {
        let start = Instant::now();
        let mut report = TeardownReport::default();
        for pool in self.pools.drain(..).flatten() {
            report.live_blocks_at_teardown += pool.live_blocks();
            for page in pool.into_pages() {
                report.pages_released += 1;
                report.bytes_released += page.memory_bytes();
                drop(page);
            }
        }
        report.elapsed = start.elapsed();
        self.released = true;

        debug!(
            pages = report.pages_released,
            bytes = report.bytes_released,
            live_blocks = report.live_blocks_at_teardown,
            elapsed_us = report.elapsed.as_micros() as u64,
            "heap torn down"
        );
        if let Some(hook) = self.teardown_hook.as_mut() {
            hook(&report);
        }
        report
    }

    fn page(&self, location: PageLocation, handle: &MemoryHandle) -> Result<&Page, HeapError> {
        self.pools
            .get(location.size_class as usize)
            .and_then(Option::as_ref)
            .and_then(|pool| pool.page(location.page_index))
            .ok_or_else(|| not_owned(handle))
    }

    fn page_mut(
        &mut self,
        location: PageLocation,
        handle: &MemoryHandle,
    ) -> Result<&mut Page, HeapError> {
        self.pools
            .get_mut(location.size_class as usize)
            .and_then(Option::as_mut)
            .and_then(|pool| pool.page_mut(location.page_index))
            .ok_or_else(|| not_owned(handle))
    }

    /// Copy the whole of `src` into the front of `dst`.
    ///
    /// `dst` is always in a strictly larger size class, so the two pools
    /// can be borrowed disjointly.
    fn copy_block(
        &mut self,
        src: &MemoryHandle,
        src_location: PageLocation,
        dst: &MemoryHandle,
        dst_location: PageLocation,
    ) -> Result<(), HeapError> {
        let (lower, upper) = self.pools.split_at_mut(dst_location.size_class as usize);
        let src_page = lower
            .get(src_location.size_class as usize)
            .and_then(Option::as_ref)
            .and_then(|pool| pool.page(src_location.page_index))
            .ok_or_else(|| not_owned(src))?;
        let dst_page = upper
            .first_mut()
            .and_then(Option::as_mut)
            .and_then(|pool| pool.page_mut(dst_location.page_index))
            .ok_or_else(|| not_owned(dst))?;

        let src_bytes = src_page.bytes(src)?;
        dst_page.bytes_mut(dst)?[..src_bytes.len()].copy_from_slice(src_bytes);
        Ok(())
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Heap {
    fn drop(&mut self) {
        if !self.released {
            self.release_all();
        }
    }
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

fn not_owned(handle: &MemoryHandle) -> HeapError {
    HeapError::NotOwned {
        address: handle.address(),
        byte_size: handle.byte_size(),
    }
}
