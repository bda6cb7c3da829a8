// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Span profiling and event aggregation.
//!
//! A [`Profiler`] follows one logical operation (a request, a job, ...):
//!
//! - **Spans**: named phases opened one after another; opening a span closes
//!   the previous one
//! - **Metadata**: fields and tags supplied by the caller
//! - **Finalize**: closes the last span and records one event with aggregate
//!   and per-span timing and memory fields
//!
//! # Usage
//!
//! ```rust,ignore
//! use ticks::profiling::profile;
//!
//! profile(logger.new_event("request"), controller.clone(), |profiler| {
//!     profiler.start_new_span("Parse request")?;
//!     parse()?;
//!     profiler.start_new_span("Run query")?;
//!     profiler.add_field("rows", rows.len())?;
//!     Ok::<_, anyhow::Error>(())
//! })?;
//! ```
//!
//! The recorded event carries `startTimestamp`, `endTimestamp`,
//! `totalExecutionTime`, `memory` and `memoryPeak`, plus for each span a
//! `spanId<Name>` UUID value and the fields `startTimestamp<Name>`,
//! `memory<Name>`, `memoryPeak<Name>` and `executionTime<Name>`.

mod memory;
mod profiler;
mod span;
mod timing;

pub use memory::{AllocatorProbe, MemoryProbe, MemoryUsage, TrackingAllocator};
pub use profiler::{profile, Profiler, ProfilerBuilder, ProfilerState};
pub use span::{normalize_span_name, Span, SpanStack};
pub use timing::{
    Clock, ExecutionTime, ManualClock, SystemClock, Timestamp, EXECUTION_TIME_SCALE,
};
