// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Memory fields backed by the tracking allocator.

use std::sync::Arc;

use ticks::controller::TracingController;
use ticks::event_logging::{EventLogger, MemoryEventLogger};
use ticks::profiling::{AllocatorProbe, MemoryProbe, Profiler, TrackingAllocator};
use ticks::types::{FieldValue, Tags};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

struct FixedController;

impl TracingController for FixedController {
    fn start_child_span(&self) {}
    fn stop_child_span(&self) {}
    fn trace_id(&self) -> Option<String> {
        Some("0f5c3c8e-2b0d-4bb4-9a3b-1c1f6f0d1a11".to_string())
    }
    fn span_id(&self) -> Option<String> {
        Some("3b241101-e2bb-4255-8caf-4136c566a962".to_string())
    }
    fn parent_span_id(&self) -> Option<String> {
        None
    }
    fn span_specific_tags(&self) -> Tags {
        Tags::new()
    }
    fn new_span_id(&self) -> String {
        "3b241101-e2bb-4255-8caf-4136c566a962".to_string()
    }
    fn is_valid_span_id(&self, _id: &str) -> bool {
        true
    }
}

fn int(value: Option<&FieldValue>) -> i64 {
    value.and_then(FieldValue::as_i64).unwrap_or(-1)
}

#[test]
fn test_allocator_counts_live_and_peak_bytes() {
    const SIZE: usize = 1 << 20;

    let buffer = vec![0u8; SIZE];
    let usage = AllocatorProbe.usage();
    assert!(usage.current >= SIZE as u64);
    assert!(usage.peak >= usage.current);
    drop(buffer);

    assert!(TrackingAllocator::peak() >= SIZE);
}

#[test]
fn test_profiler_reports_allocator_usage() {
    let logger = MemoryEventLogger::new();
    let mut profiler = Profiler::new(logger.new_event("alloc"), Arc::new(FixedController));

    let buffer = vec![1u8; 256 * 1024];
    profiler.start_new_span("hold buffer").unwrap();
    profiler.finalize().unwrap();
    drop(buffer);

    let fields = logger.last().unwrap().fields;
    assert!(int(fields.get("memoryHoldBuffer")) >= 256 * 1024);
    assert!(int(fields.get("memoryPeakHoldBuffer")) >= int(fields.get("memoryHoldBuffer")));
    assert!(int(fields.get("memoryPeak")) >= 256 * 1024);
}
