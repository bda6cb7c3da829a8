// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Event and event logger interfaces.

use crate::types::{Fields, Precision, Tags};

/// An observability event under construction.
///
/// `add_*` methods overlay new values on top of previously set ones,
/// `set_*` methods clear and replace.
#[cfg_attr(test, mockall::automock)]
pub trait Event: Send {
    /// Set event name.
    fn set_name(&mut self, name: &str);

    /// Get event name.
    fn name(&self) -> String;

    /// Set trace ID the event belongs to.
    fn set_trace_id(&mut self, trace_id: &str);

    /// Get trace ID the event belongs to.
    fn trace_id(&self) -> Option<String>;

    /// Set span ID the event belongs to.
    fn set_span_id(&mut self, span_id: &str);

    /// Get span ID the event belongs to.
    fn span_id(&self) -> Option<String>;

    /// Set span ID of the parent the event belongs to.
    fn set_parent_span_id(&mut self, span_id: &str);

    /// Get span ID of the parent the event belongs to.
    fn parent_span_id(&self) -> Option<String>;

    /// Set a UUID value.
    fn set_uuid_value(&mut self, key: &str, uuid: &str);

    /// Replace all indexed metadata.
    fn set_tags(&mut self, tags: Tags);

    /// Add indexed metadata on top of previously set values.
    fn add_tags(&mut self, tags: Tags);

    /// Get indexed metadata.
    fn tags(&self) -> Tags;

    /// Replace all unstructured metadata.
    fn set_fields(&mut self, fields: Fields);

    /// Add unstructured metadata on top of previously set values.
    fn add_fields(&mut self, fields: Fields);

    /// Get unstructured metadata.
    fn fields(&self) -> Fields;

    /// Record the current time as the event timestamp.
    fn record_timestamp(&mut self, precision: Precision);

    /// Set a custom timestamp for the event.
    fn set_timestamp(&mut self, timestamp: i64);

    /// Get the event timestamp.
    fn timestamp(&self) -> i64;

    /// Record (emit) the event.
    fn record(&mut self, precision: Precision);
}

/// Factory for events bound to one backend.
#[cfg_attr(test, mockall::automock)]
pub trait EventLogger: Send + Sync {
    /// Get an instance of a new event.
    fn new_event(&self, name: &str) -> Box<dyn Event>;
}

/// Boxed event trait object.
pub type BoxedEvent = Box<dyn Event>;
