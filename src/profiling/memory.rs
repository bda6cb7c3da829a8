// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Process memory snapshots.
//!
//! [`TrackingAllocator`] wraps the system allocator and keeps a running count
//! of live and peak heap bytes. Hosts opt in by installing it:
//!
//! ```rust,ignore
//! use ticks::profiling::TrackingAllocator;
//!
//! #[global_allocator]
//! static GLOBAL: TrackingAllocator = TrackingAllocator;
//! ```
//!
//! Without it, [`AllocatorProbe`] reports zero for both values.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);

/// Memory in use and peak memory in use, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub current: u64,
    pub peak: u64,
}

impl MemoryUsage {
    pub const fn new(current: u64, peak: u64) -> Self {
        Self { current, peak }
    }
}

/// Source of memory snapshots.
pub trait MemoryProbe: Send + Sync {
    fn usage(&self) -> MemoryUsage;
}

/// A fixed snapshot is its own probe.
impl MemoryProbe for MemoryUsage {
    fn usage(&self) -> MemoryUsage {
        *self
    }
}

/// Probe reading the counters maintained by [`TrackingAllocator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatorProbe;

impl MemoryProbe for AllocatorProbe {
    fn usage(&self) -> MemoryUsage {
        MemoryUsage {
            current: TrackingAllocator::allocated() as u64,
            peak: TrackingAllocator::peak() as u64,
        }
    }
}

/// Global allocator that counts live and peak heap bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingAllocator;

impl TrackingAllocator {
    /// Bytes currently allocated through this allocator.
    pub fn allocated() -> usize {
        ALLOCATED.load(Ordering::Relaxed)
    }

    /// Highest value `allocated()` has reached.
    pub fn peak() -> usize {
        PEAK.load(Ordering::Relaxed)
    }

    /// Reset the peak to the current allocation.
    pub fn reset_peak() {
        PEAK.store(ALLOCATED.load(Ordering::Relaxed), Ordering::Relaxed);
    }

    fn grow(bytes: usize) {
        let now = ALLOCATED.fetch_add(bytes, Ordering::Relaxed) + bytes;
        PEAK.fetch_max(now, Ordering::Relaxed);
    }

    fn shrink(bytes: usize) {
        ALLOCATED.fetch_sub(bytes, Ordering::Relaxed);
    }
}

// SAFETY: every call is forwarded unchanged to `System`; only counters are
// updated around it.
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            Self::grow(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            Self::grow(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        Self::shrink(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            let old_size = layout.size();
            if new_size > old_size {
                Self::grow(new_size - old_size);
            } else {
                Self::shrink(old_size - new_size);
            }
        }
        new_ptr
    }
}
