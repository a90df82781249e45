//! Fixed-granularity pages split into equal-size blocks.
//!
//! A [`Page`] owns one host allocation. Blocks are handed out from a bump
//! cursor until the page has been fully touched, and from an intrusive
//! free list of released blocks after that (the free list always wins when
//! it is non-empty, so reuse is LIFO).

use crate::config::HeapConfig;
use crate::error::HeapError;
use crate::handle::MemoryHandle;

/// Free-list terminator stored in the last released block.
const NIL: u32 = u32::MAX;

const BITS_PER_WORD: usize = 64;

/// One host allocation carved into blocks of a single size class.
///
/// The page is never resized, so the address of its backing buffer is
/// stable for the page's whole lifetime and handles can carry absolute
/// addresses.
pub struct Page {
    /// Backing storage. Allocated to full size at creation, never resized.
    storage: Vec<u8>,
    /// Address of `storage[0]`.
    base: usize,
    /// Size of every block in this page, in bytes.
    block_size: usize,
    /// Page offset of the most recently released block.
    ///
    /// The first four bytes of each released block hold the offset of the
    /// next one, little-endian, with [`NIL`] ending the chain.
    free_head: Option<u32>,
    /// Number of blocks reachable from `free_head`.
    free_listed: usize,
    /// Bump pointer: offset of the first block never handed out.
    cursor: usize,
    /// Number of blocks currently handed out.
    live: usize,
    /// One bit per block below `cursor`, set while the block is handed out.
    live_bits: Vec<u64>,
}

impl Page {
    /// Allocate a page of `page_bytes` split into `block_size` blocks.
    ///
    /// # Errors
    ///
    /// - [`HeapError::InvalidConfig`] if `block_size` is not a power of two
    ///   large enough to hold a free-list link, if it does not divide
    ///   `page_bytes` exactly, or if `page_bytes` does not fit in a `u32`.
    /// - [`HeapError::Exhausted`] if the host allocation fails.
    pub fn new(page_bytes: usize, block_size: usize) -> Result<Self, HeapError> {
        if !block_size.is_power_of_two() || block_size < HeapConfig::LINK_BYTES {
            return Err(HeapError::InvalidConfig {
                reason: format!(
                    "block size must be a power of two >= {}, got {block_size}",
                    HeapConfig::LINK_BYTES
                ),
            });
        }
        if page_bytes < block_size || page_bytes % block_size != 0 {
            return Err(HeapError::InvalidConfig {
                reason: format!(
                    "page of {page_bytes} bytes cannot be split into {block_size}-byte blocks"
                ),
            });
        }
        if u32::try_from(page_bytes).is_err() {
            return Err(HeapError::InvalidConfig {
                reason: format!("page_bytes must fit in u32, got {page_bytes}"),
            });
        }

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(page_bytes)
            .map_err(|_| HeapError::Exhausted {
                requested: page_bytes,
            })?;
        storage.resize(page_bytes, 0);
        let base = storage.as_ptr() as usize;

        Ok(Self {
            storage,
            base,
            block_size,
            free_head: None,
            free_listed: 0,
            cursor: 0,
            live: 0,
            live_bits: Vec::new(),
        })
    }

    /// Take one block from this page.
    ///
    /// Returns `Ok(None)` when the page is exhausted; that is a capacity
    /// signal for the pool, not an error.
    ///
    /// # Errors
    ///
    /// [`HeapError::SizeClassMismatch`] if `size` is not this page's block
    /// size.
    pub fn allocate(&mut self, size: usize) -> Result<Option<MemoryHandle>, HeapError> {
        self.check_size(size)?;

        let offset = if let Some(head) = self.free_head {
            let offset = head as usize;
            let next = self.read_link(offset);
            self.free_head = (next != NIL).then_some(next);
            self.free_listed -= 1;
            offset
        } else if self.cursor < self.storage.len() {
            let offset = self.cursor;
            self.cursor += self.block_size;
            offset
        } else {
            return Ok(None);
        };

        self.set_live(offset, true);
        self.live += 1;
        Ok(Some(MemoryHandle::new(self.base + offset, self.block_size)))
    }

    /// Return a block to this page's free list.
    ///
    /// # Errors
    ///
    /// - [`HeapError::SizeClassMismatch`] if the handle's size differs from
    ///   this page's block size.
    /// - [`HeapError::NotOwned`] if the address is outside this page, not on
    ///   a block boundary, or names a block that is not currently handed out
    ///   (never allocated, or already released).
    pub fn release(&mut self, handle: MemoryHandle) -> Result<(), HeapError> {
        let offset = self.offset_of(&handle)?;
        self.set_live(offset, false);
        self.write_link(offset, self.free_head.unwrap_or(NIL));
        // offset < page_bytes <= u32::MAX, checked at construction.
        self.free_head = Some(offset as u32);
        self.free_listed += 1;
        self.live -= 1;
        Ok(())
    }

    /// Whether `address` falls inside this page.
    pub fn contains(&self, address: usize) -> bool {
        address >= self.base && address - self.base < self.storage.len()
    }

    /// Shared view of a handed-out block's bytes.
    ///
    /// # Errors
    ///
    /// Same ownership checks as [`Page::release`].
    pub fn bytes(&self, handle: &MemoryHandle) -> Result<&[u8], HeapError> {
        let offset = self.offset_of(handle)?;
        Ok(&self.storage[offset..offset + self.block_size])
    }

    /// Mutable view of a handed-out block's bytes.
    ///
    /// # Errors
    ///
    /// Same ownership checks as [`Page::release`].
    pub fn bytes_mut(&mut self, handle: &MemoryHandle) -> Result<&mut [u8], HeapError> {
        let offset = self.offset_of(handle)?;
        Ok(&mut self.storage[offset..offset + self.block_size])
    }

    /// Address of the first byte of the page.
    pub fn base_address(&self) -> usize {
        self.base
    }

    /// Block size in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Total number of blocks in the page.
    pub fn block_count(&self) -> usize {
        self.storage.len() / self.block_size
    }

    /// Blocks available for allocation: the free list plus untouched blocks.
    pub fn free_count(&self) -> usize {
        self.free_listed + (self.storage.len() - self.cursor) / self.block_size
    }

    /// Blocks currently handed out.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Whether no block can be handed out without adding a page.
    pub fn is_exhausted(&self) -> bool {
        self.free_count() == 0
    }

    /// Size of the host allocation in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.storage.len()
    }

    fn check_size(&self, size: usize) -> Result<(), HeapError> {
        if size != self.block_size {
            return Err(HeapError::SizeClassMismatch {
                expected: self.block_size,
                actual: size,
            });
        }
        Ok(())
    }

    /// Validate a handle and translate it into a page offset.
    fn offset_of(&self, handle: &MemoryHandle) -> Result<usize, HeapError> {
        self.check_size(handle.byte_size)?;
        if !self.contains(handle.address) {
            return Err(not_owned(handle));
        }
        let offset = handle.address - self.base;
        if offset % self.block_size != 0 || offset >= self.cursor || !self.is_live(offset) {
            return Err(not_owned(handle));
        }
        Ok(offset)
    }

    fn is_live(&self, offset: usize) -> bool {
        let index = offset / self.block_size;
        let (word, bit) = (index / BITS_PER_WORD, index % BITS_PER_WORD);
        word < self.live_bits.len() && self.live_bits[word] & (1u64 << bit) != 0
    }

    fn set_live(&mut self, offset: usize, live: bool) {
        let index = offset / self.block_size;
        let (word, bit) = (index / BITS_PER_WORD, index % BITS_PER_WORD);
        if word >= self.live_bits.len() {
            self.live_bits.resize(word + 1, 0);
        }
        if live {
            self.live_bits[word] |= 1u64 << bit;
        } else {
            self.live_bits[word] &= !(1u64 << bit);
        }
    }

    fn read_link(&self, offset: usize) -> u32 {
        let mut link = [0u8; HeapConfig::LINK_BYTES];
        link.copy_from_slice(&self.storage[offset..offset + HeapConfig::LINK_BYTES]);
        u32::from_le_bytes(link)
    }

    fn write_link(&mut self, offset: usize, next: u32) {
        self.storage[offset..offset + HeapConfig::LINK_BYTES]
            .copy_from_slice(&next.to_le_bytes());
    }
}

fn not_owned(handle: &MemoryHandle) -> HeapError {
    HeapError::NotOwned {
        address: handle.address,
        byte_size: handle.byte_size,
    }
}
