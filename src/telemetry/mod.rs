// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Logging for the profiler.
//!
//! The crate logs through `tracing` macros only; a host that wants to see
//! those lines installs a subscriber once at startup:
//!
//! ```rust,ignore
//! use ticks::telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::default().with_filter("ticks=debug"))?;
//! ```
//!
//! Levels used:
//! - `debug`: span open and close
//! - `info`: finalize and recorded events
//! - `warn`: double finalize, invalid UUID values
//! - `error`: a finalize triggered by drop that failed
//!
//! Build with `--features release-logs` to compile out debug/trace lines or
//! `--features max-perf` to compile out all of them.

mod init;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
