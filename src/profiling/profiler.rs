// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The profiler: one instance per profiled operation.

use std::sync::Arc;

use crate::controller::{SharedController, TracingController};
use crate::error::ProfilerError;
use crate::event_logging::Event;
use crate::types::{FieldValue, Fields, Precision, TagValue, Tags};

use super::memory::{AllocatorProbe, MemoryProbe};
use super::span::{Span, SpanStack};
use super::timing::{Clock, SystemClock, Timestamp};

/// Lifecycle state of a [`Profiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilerState {
    Open,
    Finalized,
}

/// Collects spans and metadata for one operation and records them as a
/// single event.
///
/// The event is recorded exactly once: by [`Profiler::finalize`], or when the
/// profiler is dropped if it was never finalized. Errors from a drop-time
/// finalize can only be logged; use [`Profiler::scope`] or call `finalize`
/// explicitly to observe them.
pub struct Profiler {
    event: Box<dyn Event>,
    controller: SharedController,
    clock: Arc<dyn Clock>,
    memory: Arc<dyn MemoryProbe>,
    precision: Precision,
    start_timestamp: Timestamp,
    fields: Fields,
    tags: Tags,
    spans: SpanStack,
    state: ProfilerState,
}

impl Profiler {
    /// Create a profiler using the system clock and allocator counters.
    pub fn new(event: Box<dyn Event>, controller: SharedController) -> Self {
        Self::builder(event, controller).build()
    }

    pub fn builder(event: Box<dyn Event>, controller: SharedController) -> ProfilerBuilder {
        ProfilerBuilder::new(event, controller)
    }

    pub fn start_timestamp(&self) -> Timestamp {
        self.start_timestamp
    }

    pub fn state(&self) -> ProfilerState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == ProfilerState::Finalized
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Spans opened so far, in opening order.
    pub fn spans(&self) -> &[Span] {
        self.spans.spans()
    }

    /// Set trace ID on the event directly.
    pub fn set_trace_id(&mut self, trace_id: &str) -> Result<(), ProfilerError> {
        self.ensure_open()?;
        self.event.set_trace_id(trace_id);
        Ok(())
    }

    /// Set span ID on the event directly.
    pub fn set_span_id(&mut self, span_id: &str) -> Result<(), ProfilerError> {
        self.ensure_open()?;
        self.event.set_span_id(span_id);
        Ok(())
    }

    /// Add a single piece of unstructured metadata.
    pub fn add_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<(), ProfilerError> {
        self.add_fields(Fields::from([(key.into(), value.into())]))
    }

    /// Add unstructured metadata on top of previously set values.
    ///
    /// Values are pushed to the event right away and win over computed
    /// profiling fields of the same name when the profiler finalizes.
    pub fn add_fields(&mut self, fields: Fields) -> Result<(), ProfilerError> {
        self.ensure_open()?;
        self.fields
            .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.event.add_fields(fields);
        Ok(())
    }

    /// Add a single piece of indexed metadata.
    pub fn add_tag(
        &mut self,
        key: impl Into<String>,
        value: impl Into<TagValue>,
    ) -> Result<(), ProfilerError> {
        self.add_tags(Tags::from([(key.into(), value.into())]))
    }

    /// Add indexed metadata on top of previously set values.
    pub fn add_tags(&mut self, tags: Tags) -> Result<(), ProfilerError> {
        self.ensure_open()?;
        self.tags
            .extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.event.add_tags(tags);
        Ok(())
    }

    /// Field value as currently stored on the event.
    pub fn field(&self, key: &str) -> Option<FieldValue> {
        self.event.fields().remove(key)
    }

    /// Fields as currently stored on the event.
    pub fn fields(&self) -> Fields {
        self.event.fields()
    }

    /// Tag value as currently stored on the event.
    pub fn tag(&self, key: &str) -> Option<TagValue> {
        self.event.tags().remove(key)
    }

    /// Tags as currently stored on the event.
    pub fn tags(&self) -> Tags {
        self.event.tags()
    }

    /// Start a new span, closing the one currently open.
    pub fn start_new_span(&mut self, name: &str) -> Result<(), ProfilerError> {
        self.ensure_open()?;
        let now = self.clock.now();
        self.spans.open(
            name,
            now,
            self.controller.as_ref(),
            self.memory.as_ref(),
        )?;
        Ok(())
    }

    /// Close the open span, compute the profile and record the event.
    ///
    /// The profiler is finalized afterwards even if this fails: the
    /// controller has already been told the open span stopped. Nothing is
    /// written to the event when a trace or span ID is missing.
    pub fn finalize(&mut self) -> Result<(), ProfilerError> {
        if self.is_finalized() {
            tracing::warn!("Profiler finalized more than once");
            return Err(ProfilerError::AlreadyFinalized);
        }
        self.state = ProfilerState::Finalized;

        let now = self.clock.now();
        self.spans.close_previous(now, self.controller.as_ref());

        let total_execution_time = now.elapsed_since(self.start_timestamp);
        let usage = self.memory.usage();

        let mut computed = Fields::from([
            (
                "startTimestamp".to_string(),
                FieldValue::Float(self.start_timestamp.as_secs_f64()),
            ),
            ("endTimestamp".to_string(), FieldValue::Float(now.as_secs_f64())),
            (
                "totalExecutionTime".to_string(),
                FieldValue::Float(total_execution_time.as_secs_f64()),
            ),
            ("memory".to_string(), FieldValue::from(usage.current)),
            ("memoryPeak".to_string(), FieldValue::from(usage.peak)),
        ]);

        let mut uuid_values = Vec::with_capacity(self.spans.len());
        for span in &self.spans {
            uuid_values.push((span.span_id_key(), span.span_id().to_string()));
            computed.extend(span.fields());
        }

        let trace_id = self
            .controller
            .trace_id()
            .ok_or(ProfilerError::TraceIdUnavailable)?;
        let span_id = self
            .controller
            .span_id()
            .ok_or(ProfilerError::SpanIdUnavailable)?;

        // Custom metadata wins over computed values and controller tags.
        computed.extend(std::mem::take(&mut self.fields));
        let mut tags = self.controller.span_specific_tags();
        tags.extend(std::mem::take(&mut self.tags));

        self.event.set_trace_id(&trace_id);
        self.event.set_span_id(&span_id);
        for (key, uuid) in &uuid_values {
            self.event.set_uuid_value(key, uuid);
        }
        self.event.add_fields(computed);
        self.event.add_tags(tags);
        self.event.record_timestamp(self.precision);
        self.event.record(self.precision);

        tracing::info!(
            trace_id = %trace_id,
            span_id = %span_id,
            spans = self.spans.len(),
            total_execution_time = %total_execution_time,
            "Profile recorded"
        );
        Ok(())
    }

    /// Run `f` with this profiler and finalize it afterwards, on success and
    /// on error alike.
    ///
    /// An error from `f` takes precedence; a finalize error hidden behind it
    /// is logged. If `f` panics, the profiler is finalized on drop.
    pub fn scope<T, E, F>(mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Profiler) -> Result<T, E>,
        E: From<ProfilerError>,
    {
        let result = f(&mut self);
        let finalized = if self.is_finalized() {
            Ok(())
        } else {
            self.finalize()
        };

        match (result, finalized) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(finalize_err)) => {
                tracing::error!(error = %finalize_err, "Failed to finalize profiler after operation error");
                Err(err)
            }
        }
    }

    fn ensure_open(&self) -> Result<(), ProfilerError> {
        match self.state {
            ProfilerState::Open => Ok(()),
            ProfilerState::Finalized => Err(ProfilerError::AlreadyFinalized),
        }
    }
}

impl Drop for Profiler {
    fn drop(&mut self) {
        if self.is_finalized() {
            return;
        }
        if let Err(err) = self.finalize() {
            tracing::error!(error = %err, "Failed to finalize profiler on drop");
        }
    }
}

impl std::fmt::Debug for Profiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profiler")
            .field("start_timestamp", &self.start_timestamp)
            .field("precision", &self.precision)
            .field("fields", &self.fields)
            .field("tags", &self.tags)
            .field("spans", &self.spans)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Profile one operation: build a profiler, run `f`, finalize.
pub fn profile<T, E, F>(event: Box<dyn Event>, controller: SharedController, f: F) -> Result<T, E>
where
    F: FnOnce(&mut Profiler) -> Result<T, E>,
    E: From<ProfilerError>,
{
    Profiler::new(event, controller).scope(f)
}

/// Builder for [`Profiler`] with injectable clock and memory probe.
pub struct ProfilerBuilder {
    event: Box<dyn Event>,
    controller: SharedController,
    clock: Option<Arc<dyn Clock>>,
    memory: Option<Arc<dyn MemoryProbe>>,
    start_timestamp: Option<Timestamp>,
    precision: Precision,
}

impl ProfilerBuilder {
    pub fn new(event: Box<dyn Event>, controller: SharedController) -> Self {
        Self {
            event,
            controller,
            clock: None,
            memory: None,
            start_timestamp: None,
            precision: Precision::default(),
        }
    }

    /// Use a custom clock instead of the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a custom memory probe instead of the allocator counters.
    pub fn memory_probe(mut self, memory: Arc<dyn MemoryProbe>) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Start the session at `start` instead of the clock's current time.
    pub fn start_timestamp(mut self, start: Timestamp) -> Self {
        self.start_timestamp = Some(start);
        self
    }

    /// Precision of the recorded event timestamp.
    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn build(self) -> Profiler {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let start_timestamp = self.start_timestamp.unwrap_or_else(|| clock.now());
        tracing::debug!(start = %start_timestamp, "Profiler started");

        Profiler {
            event: self.event,
            controller: self.controller,
            clock,
            memory: self.memory.unwrap_or_else(|| Arc::new(AllocatorProbe)),
            precision: self.precision,
            start_timestamp,
            fields: Fields::new(),
            tags: Tags::new(),
            spans: SpanStack::new(),
            state: ProfilerState::Open,
        }
    }
}
