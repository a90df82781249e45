//! Heap statistics and teardown reporting.
//!
//! [`HeapStats`] is a point-in-time summary of a live heap.
//! [`TeardownReport`] is produced exactly once, when the heap releases its
//! pages, and is handed to the optional teardown hook. Both are
//! instrumentation only; nothing in the allocator depends on them.

use std::time::Duration;

/// Point-in-time usage summary of a [`crate::Heap`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Number of size classes with a pool.
    pub pool_count: usize,
    /// Number of pages (host allocations) across all pools.
    pub page_count: usize,
    /// Total bytes held in pages.
    pub memory_bytes: usize,
    /// Blocks currently handed out.
    pub live_blocks: usize,
    /// Cumulative successful `allocate()` calls, including those made by `grow()`.
    pub allocations: u64,
    /// Cumulative successful `free()` calls.
    pub frees: u64,
    /// Cumulative successful `grow()` calls.
    pub grows: u64,
}

/// Summary of a heap teardown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Pages whose host allocation was released.
    pub pages_released: usize,
    /// Bytes returned to the host allocator.
    pub bytes_released: usize,
    /// Blocks that were still handed out when the heap went away.
    ///
    /// Non-zero is normal: owners such as a sparsity pattern never free
    /// their rows individually and rely on teardown instead.
    pub live_blocks_at_teardown: usize,
    /// Wall-clock time spent releasing pages.
    pub elapsed: Duration,
}
