// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tracing controller interface.
//!
//! The controller issues and validates trace and span identifiers and keeps
//! track of nesting depth. One controller is usually shared by every profiler
//! taking part in a trace, so it is handed around as
//! `Arc<dyn TracingController>` and mutates through `&self`.

use std::sync::Arc;

use crate::types::Tags;

/// Control over, and read access to, the tracing process.
#[cfg_attr(test, mockall::automock)]
pub trait TracingController: Send + Sync {
    /// Start a new child span. Subsequent `span_id()` calls return its ID.
    fn start_child_span(&self);

    /// Stop the current child span, returning to the scope of the parent.
    fn stop_child_span(&self);

    /// Trace ID the current scope belongs to.
    fn trace_id(&self) -> Option<String>;

    /// Span ID of the current scope.
    fn span_id(&self) -> Option<String>;

    /// Span ID of the parent of the current scope.
    fn parent_span_id(&self) -> Option<String>;

    /// Tags the controller wants attached to events of the current span.
    fn span_specific_tags(&self) -> Tags;

    /// Get a new ID that can be used as a span ID.
    fn new_span_id(&self) -> String;

    /// Check whether a given string is valid for use as a span ID.
    fn is_valid_span_id(&self, id: &str) -> bool;
}

/// Shared handle to a tracing controller.
pub type SharedController = Arc<dyn TracingController>;
