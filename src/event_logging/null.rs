// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! No-op event logging, for disabling observability without branching at call sites.

use super::event::{Event, EventLogger};
use crate::types::{Fields, Precision, Tags};

/// Event logger that hands out events which discard everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventLogger;

impl NullEventLogger {
    pub fn new() -> Self {
        Self
    }
}

impl EventLogger for NullEventLogger {
    fn new_event(&self, _name: &str) -> Box<dyn Event> {
        Box::new(NullEvent)
    }
}

/// Event that ignores every write and reads back empty values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEvent;

impl Event for NullEvent {
    fn set_name(&mut self, _name: &str) {}

    fn name(&self) -> String {
        String::new()
    }

    fn set_trace_id(&mut self, _trace_id: &str) {}

    fn trace_id(&self) -> Option<String> {
        None
    }

    fn set_span_id(&mut self, _span_id: &str) {}

    fn span_id(&self) -> Option<String> {
        None
    }

    fn set_parent_span_id(&mut self, _span_id: &str) {}

    fn parent_span_id(&self) -> Option<String> {
        None
    }

    fn set_uuid_value(&mut self, _key: &str, _uuid: &str) {}

    fn set_tags(&mut self, _tags: Tags) {}

    fn add_tags(&mut self, _tags: Tags) {}

    fn tags(&self) -> Tags {
        Tags::new()
    }

    fn set_fields(&mut self, _fields: Fields) {}

    fn add_fields(&mut self, _fields: Fields) {}

    fn fields(&self) -> Fields {
        Fields::new()
    }

    fn record_timestamp(&mut self, _precision: Precision) {}

    fn set_timestamp(&mut self, _timestamp: i64) {}

    fn timestamp(&self) -> i64 {
        0
    }

    fn record(&mut self, _precision: Precision) {}
}
