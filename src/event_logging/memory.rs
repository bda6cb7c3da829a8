// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory event logging.
//!
//! [`MemoryEventLogger`] is a cheap, cloneable handle to a shared log of
//! recorded events. Every [`MemoryEvent`] it creates appends an [`EventRecord`]
//! snapshot to that log when recorded, and reports the event through `tracing`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::{Event, EventLogger};
use crate::types::{Fields, Precision, Tags};

/// Snapshot of an event at the moment it was recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub uuid_values: BTreeMap<String, Uuid>,
    pub tags: Tags,
    pub fields: Fields,
    pub timestamp: i64,
    pub precision: Precision,
}

/// Event logger that keeps recorded events in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventLogger {
    records: Arc<Mutex<Vec<EventRecord>>>,
}

impl MemoryEventLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new event with its concrete type.
    pub fn event(&self, name: &str) -> MemoryEvent {
        MemoryEvent::new(name, self.clone())
    }

    /// All events recorded so far, oldest first.
    pub fn records(&self) -> Vec<EventRecord> {
        self.lock().clone()
    }

    /// The most recently recorded event.
    pub fn last(&self) -> Option<EventRecord> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, record: EventRecord) {
        self.lock().push(record);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EventRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventLogger for MemoryEventLogger {
    fn new_event(&self, name: &str) -> Box<dyn Event> {
        Box::new(self.event(name))
    }
}

/// Event that records into a [`MemoryEventLogger`].
#[derive(Debug)]
pub struct MemoryEvent {
    state: EventRecord,
    has_timestamp: bool,
    logger: MemoryEventLogger,
}

impl MemoryEvent {
    pub fn new(name: &str, logger: MemoryEventLogger) -> Self {
        Self {
            state: EventRecord {
                name: name.to_string(),
                ..Default::default()
            },
            has_timestamp: false,
            logger,
        }
    }

    /// Current state of the event, recorded or not.
    pub fn snapshot(&self) -> &EventRecord {
        &self.state
    }
}

impl Event for MemoryEvent {
    fn set_name(&mut self, name: &str) {
        self.state.name = name.to_string();
    }

    fn name(&self) -> String {
        self.state.name.clone()
    }

    fn set_trace_id(&mut self, trace_id: &str) {
        self.state.trace_id = Some(trace_id.to_string());
    }

    fn trace_id(&self) -> Option<String> {
        self.state.trace_id.clone()
    }

    fn set_span_id(&mut self, span_id: &str) {
        self.state.span_id = Some(span_id.to_string());
    }

    fn span_id(&self) -> Option<String> {
        self.state.span_id.clone()
    }

    fn set_parent_span_id(&mut self, span_id: &str) {
        self.state.parent_span_id = Some(span_id.to_string());
    }

    fn parent_span_id(&self) -> Option<String> {
        self.state.parent_span_id.clone()
    }

    fn set_uuid_value(&mut self, key: &str, uuid: &str) {
        match Uuid::parse_str(uuid) {
            Ok(parsed) => {
                self.state.uuid_values.insert(key.to_string(), parsed);
            }
            Err(err) => {
                tracing::warn!(
                    event = %self.state.name,
                    key = %key,
                    value = %uuid,
                    error = %err,
                    "Dropping invalid UUID value"
                );
            }
        }
    }

    fn set_tags(&mut self, tags: Tags) {
        self.state.tags = tags;
    }

    fn add_tags(&mut self, tags: Tags) {
        self.state.tags.extend(tags);
    }

    fn tags(&self) -> Tags {
        self.state.tags.clone()
    }

    fn set_fields(&mut self, fields: Fields) {
        self.state.fields = fields;
    }

    fn add_fields(&mut self, fields: Fields) {
        self.state.fields.extend(fields);
    }

    fn fields(&self) -> Fields {
        self.state.fields.clone()
    }

    fn record_timestamp(&mut self, precision: Precision) {
        self.state.timestamp = precision.timestamp(chrono::Utc::now());
        self.state.precision = precision;
        self.has_timestamp = true;
    }

    fn set_timestamp(&mut self, timestamp: i64) {
        self.state.timestamp = timestamp;
        self.has_timestamp = true;
    }

    fn timestamp(&self) -> i64 {
        self.state.timestamp
    }

    fn record(&mut self, precision: Precision) {
        if !self.has_timestamp {
            self.record_timestamp(precision);
        }
        self.state.precision = precision;

        match serde_json::to_string(&self.state) {
            Ok(json) => tracing::info!(event = %self.state.name, payload = %json, "Event recorded"),
            Err(e) => tracing::warn!(event = %self.state.name, error = %e, "Event not serializable"),
        }

        self.logger.push(self.state.clone());
    }
}
