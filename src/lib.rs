// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Ticks - in-process execution profiling.
//!
//! Follows one logical operation through a series of named spans and
//! aggregates wall-clock timing, memory usage and caller metadata into a
//! single observability event.
//!
//! # Architecture
//!
//! - [`profiling`] - The [`Profiler`], its spans, clocks and memory probes
//! - [`event_logging`] - The event sink traits plus null and recording sinks
//! - [`controller`] - The tracing controller that issues trace and span ids
//! - [`types`] - Field and tag values, timestamp precision, detail levels
//! - [`error`] - Error types and result aliases
//! - [`config`] - Configuration loading and merging
//! - [`telemetry`] - `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use ticks::config::load_config;
//! use ticks::event_logging::MemoryEventLogger;
//!
//! let config = load_config(".")?;
//! let logger = MemoryEventLogger::new();
//!
//! let mut profiler = config.profiler(&logger, controller.clone());
//! profiler.start_new_span("Fetch")?;
//! fetch()?;
//! profiler.start_new_span("Render")?;
//! render()?;
//! profiler.finalize()?;
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod event_logging;
pub mod profiling;
pub mod telemetry;
pub mod types;

// Re-export commonly used types at crate root
pub use config::ObservabilityConfig;
pub use controller::{SharedController, TracingController};
pub use error::{ConfigError, ProfilerError, Result};
pub use event_logging::{Event, EventLogger, MemoryEventLogger, NullEventLogger};
pub use profiling::{profile, ExecutionTime, Profiler, Span, Timestamp};
pub use types::{AnalyticsDetailLevel, FieldValue, Fields, Precision, TagValue, Tags};

/// Ticks version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
