//! Integration test: every page a heap allocates goes back to the host.
//!
//! Installs a counting global allocator that tracks allocations of exactly
//! the page size used below. No other code in this test binary allocates
//! buffers of that size, so the live count isolates the heap's pages.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use sparsity_heap::{Heap, HeapConfig};

const PAGE_BYTES: usize = 1 << 20;

struct PageCounter;

static LIVE_PAGES: AtomicI64 = AtomicI64::new(0);
static TOTAL_PAGES: AtomicU64 = AtomicU64::new(0);

// SAFETY: forwards every call to `System` unchanged; only counts.
unsafe impl GlobalAlloc for PageCounter {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout.size() == PAGE_BYTES {
            LIVE_PAGES.fetch_add(1, Ordering::Relaxed);
            TOTAL_PAGES.fetch_add(1, Ordering::Relaxed);
        }
        // SAFETY: caller upholds the `GlobalAlloc::alloc` contract.
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if layout.size() == PAGE_BYTES {
            LIVE_PAGES.fetch_sub(1, Ordering::Relaxed);
        }
        // SAFETY: caller upholds the `GlobalAlloc::dealloc` contract.
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: PageCounter = PageCounter;

#[test]
fn teardown_returns_every_page_to_the_host() {
    let config = HeapConfig::new().with_page_bytes(PAGE_BYTES);
    let mut heap = Heap::with_config(config).unwrap();

    // Several classes, several pages in the largest one.
    let mut held = Vec::new();
    for _ in 0..5 {
        held.push(heap.allocate(PAGE_BYTES / 2).unwrap());
    }
    for size in [1, 7, 33, 1000, 4096] {
        held.push(heap.allocate(size).unwrap());
    }
    let small = held.swap_remove(5);
    held.push(heap.grow(small, 64).unwrap());

    let pages = heap.stats().page_count;
    assert!(pages >= 8);
    assert_eq!(LIVE_PAGES.load(Ordering::Relaxed), pages as i64);

    let report = heap.teardown();
    assert_eq!(report.pages_released, pages);
    assert_eq!(report.bytes_released, pages * PAGE_BYTES);
    assert_eq!(LIVE_PAGES.load(Ordering::Relaxed), 0);
    assert_eq!(TOTAL_PAGES.load(Ordering::Relaxed), pages as u64);
}
