// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Span records and the span sequencer.

use std::collections::HashSet;

use crate::controller::TracingController;
use crate::error::ProfilerError;
use crate::types::FieldValue;

use super::memory::{MemoryProbe, MemoryUsage};
use super::timing::{ExecutionTime, Timestamp};

/// Suffix used for spans whose name normalizes to nothing.
const UNNAMED_SPAN: &str = "Span";

/// Prefixes of the per-span event fields; the span name is appended.
const SPAN_FIELD_PREFIXES: [&str; 4] = ["startTimestamp", "memory", "memoryPeak", "executionTime"];

/// Session-wide event fields recorded next to the per-span ones.
const AGGREGATE_FIELDS: [&str; 5] = [
    "startTimestamp",
    "endTimestamp",
    "totalExecutionTime",
    "memory",
    "memoryPeak",
];

fn span_field_keys(suffix: &str) -> impl Iterator<Item = String> + '_ {
    SPAN_FIELD_PREFIXES
        .into_iter()
        .map(move |prefix| format!("{prefix}{suffix}"))
}

/// Turn a display name into a compact field-name suffix.
///
/// Words are split on whitespace, the first letter of each word is
/// upper-cased and the rest is kept as is: `"Unit test run"` becomes
/// `"UnitTestRun"`.
pub fn normalize_span_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// One profiled phase of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    name: String,
    span_id: String,
    start_timestamp: Timestamp,
    memory: MemoryUsage,
    execution_time: Option<ExecutionTime>,
}

impl Span {
    fn open(name: String, span_id: String, start_timestamp: Timestamp, memory: MemoryUsage) -> Self {
        Self {
            name,
            span_id,
            start_timestamp,
            memory,
            execution_time: None,
        }
    }

    /// Normalized name, unique within the session.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    pub fn start_timestamp(&self) -> Timestamp {
        self.start_timestamp
    }

    /// Memory snapshot taken when the span was opened.
    pub fn memory(&self) -> MemoryUsage {
        self.memory
    }

    /// Elapsed time once closed, zero while still open.
    pub fn execution_time(&self) -> ExecutionTime {
        self.execution_time.unwrap_or(ExecutionTime::ZERO)
    }

    pub fn is_open(&self) -> bool {
        self.execution_time.is_none()
    }

    /// Field name of the span ID UUID value.
    pub fn span_id_key(&self) -> String {
        format!("spanId{}", self.name)
    }

    /// Span-scoped event fields, keyed with the span name as suffix.
    pub fn fields(&self) -> [(String, FieldValue); 4] {
        let [start, memory, peak, elapsed] = SPAN_FIELD_PREFIXES;
        [
            (
                format!("{start}{}", self.name),
                FieldValue::Float(self.start_timestamp.as_secs_f64()),
            ),
            (
                format!("{memory}{}", self.name),
                FieldValue::from(self.memory.current),
            ),
            (
                format!("{peak}{}", self.name),
                FieldValue::from(self.memory.peak),
            ),
            (
                format!("{elapsed}{}", self.name),
                FieldValue::Float(self.execution_time().as_secs_f64()),
            ),
        ]
    }

    fn close(&mut self, now: Timestamp) -> ExecutionTime {
        let start = self.start_timestamp;
        *self
            .execution_time
            .get_or_insert_with(|| now.elapsed_since(start))
    }
}

/// Ordered spans of one profiling session, at most one of them open.
#[derive(Debug, Default)]
pub struct SpanStack {
    spans: Vec<Span>,
}

impl SpanStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Span> {
        self.spans.iter()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The currently open span, if any.
    pub fn current(&self) -> Option<&Span> {
        self.spans.last().filter(|span| span.is_open())
    }

    /// Close the open span and open a new one named `name`.
    ///
    /// Fails without appending anything when the controller has no span ID
    /// for the new child span. The child span is stopped again in that case,
    /// leaving the controller at the depth it had before the call.
    pub fn open(
        &mut self,
        name: &str,
        now: Timestamp,
        controller: &dyn TracingController,
        memory: &dyn MemoryProbe,
    ) -> Result<&Span, ProfilerError> {
        self.close_previous(now, controller);

        controller.start_child_span();
        let Some(span_id) = controller.span_id() else {
            controller.stop_child_span();
            tracing::debug!(span = %name, "No span ID available for new span");
            return Err(ProfilerError::SpanIdUnavailable);
        };

        let suffix = self.unique_suffix(name);
        tracing::debug!(span = %suffix, span_id = %span_id, start = %now, "Span opened");

        let index = self.spans.len();
        self.spans
            .push(Span::open(suffix, span_id, now, memory.usage()));
        Ok(&self.spans[index])
    }

    /// Close the open span, if there is one, ending it at `now`.
    ///
    /// Returns the execution time of the span that was closed.
    pub fn close_previous(
        &mut self,
        now: Timestamp,
        controller: &dyn TracingController,
    ) -> Option<ExecutionTime> {
        let span = self.spans.last_mut().filter(|span| span.is_open())?;

        controller.stop_child_span();
        let execution_time = span.close(now);
        tracing::debug!(
            span = %span.name,
            execution_time = %execution_time,
            "Span closed"
        );
        Some(execution_time)
    }

    /// Pick a suffix none of whose field keys is already used by an earlier
    /// span or by the aggregate fields: `"peak"` becomes `Peak2` because
    /// `memoryPeak` is taken.
    fn unique_suffix(&self, name: &str) -> String {
        let mut base = normalize_span_name(name);
        if base.is_empty() {
            base = UNNAMED_SPAN.to_string();
        }

        let taken: HashSet<String> = AGGREGATE_FIELDS
            .iter()
            .map(|key| key.to_string())
            .chain(self.spans.iter().flat_map(|span| span_field_keys(&span.name)))
            .collect();
        let is_free = |suffix: &str| span_field_keys(suffix).all(|key| !taken.contains(&key));

        if is_free(&base) {
            return base;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}{}", base, n);
            if is_free(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl<'a> IntoIterator for &'a SpanStack {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::MockTracingController;

    const SPAN_ID: &str = "8d1a5341-16f9-4608-bf51-db198e52575c";
    const SPAN_ID_2: &str = "9da74534-21d6-4a75-b58e-d27273a35330";

    fn ts(secs: f64) -> Timestamp {
        Timestamp::from_secs_f64(secs)
    }

    fn controller_returning(ids: &[&str]) -> MockTracingController {
        let mut controller = MockTracingController::new();
        controller.expect_start_child_span().return_const(());
        controller.expect_stop_child_span().return_const(());
        let mut ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        ids.reverse();
        controller
            .expect_span_id()
            .returning(move || ids.pop());
        controller
    }

    #[test]
    fn test_normalize_span_name() {
        assert_eq!(normalize_span_name("Unit test run"), "UnitTestRun");
        assert_eq!(normalize_span_name("Unit test run 2"), "UnitTestRun2");
        assert_eq!(normalize_span_name("  load\tconfig\nfile "), "LoadConfigFile");
        assert_eq!(normalize_span_name("alreadyCamel"), "AlreadyCamel");
        assert_eq!(normalize_span_name("élan vital"), "ÉlanVital");
        assert_eq!(normalize_span_name("   "), "");
    }

    #[test]
    fn test_close_previous_without_spans_is_noop() {
        let mut stack = SpanStack::new();
        let mut controller = MockTracingController::new();
        controller.expect_stop_child_span().never();

        assert!(stack.close_previous(ts(1734352683.4537), &controller).is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_close_previous_sets_execution_time() {
        let mut stack = SpanStack::new();
        let controller = controller_returning(&[SPAN_ID]);
        let memory = MemoryUsage::new(526_160, 561_488);

        stack
            .open("Unit test run", ts(1734352683.3516), &controller, &memory)
            .unwrap();
        let closed = stack.close_previous(ts(1734352683.4537), &controller);

        assert_eq!(closed, Some(ExecutionTime::from_ticks(1021)));
        let span = &stack.spans()[0];
        assert!(!span.is_open());
        assert_eq!(span.execution_time().as_secs_f64(), 0.1021);
    }

    #[test]
    fn test_close_previous_only_closes_once() {
        let mut stack = SpanStack::new();
        let mut controller = MockTracingController::new();
        controller.expect_start_child_span().times(1).return_const(());
        controller.expect_stop_child_span().times(1).return_const(());
        controller
            .expect_span_id()
            .return_const(Some(SPAN_ID.to_string()));
        let memory = MemoryUsage::default();

        stack.open("a", ts(10.0), &controller, &memory).unwrap();
        assert!(stack.close_previous(ts(11.0), &controller).is_some());
        assert!(stack.close_previous(ts(12.0), &controller).is_none());
        assert_eq!(stack.spans()[0].execution_time().ticks(), 10_000);
    }

    #[test]
    fn test_open_without_previous_span() {
        let mut stack = SpanStack::new();
        let controller = controller_returning(&[SPAN_ID]);
        let memory = MemoryUsage::new(526_160, 561_488);

        let span = stack
            .open("Unit test run", ts(1734352683.3526), &controller, &memory)
            .unwrap();

        assert_eq!(span.name(), "UnitTestRun");
        assert_eq!(span.span_id(), SPAN_ID);
        assert_eq!(span.start_timestamp(), ts(1734352683.3526));
        assert_eq!(span.memory(), memory);
        assert!(span.is_open());
        assert!(span.execution_time().is_zero());
    }

    #[test]
    fn test_open_closes_previous_span() {
        let mut stack = SpanStack::new();
        let controller = controller_returning(&[SPAN_ID, SPAN_ID_2]);
        let memory = MemoryUsage::default();

        stack
            .open("Unit test run", ts(1734352683.3516), &controller, &memory)
            .unwrap();
        stack
            .open("Unit test run 2", ts(1734352683.3526), &controller, &memory)
            .unwrap();

        let spans = stack.spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].execution_time().as_secs_f64(), 0.001);
        assert!(!spans[0].is_open());
        assert_eq!(spans[1].name(), "UnitTestRun2");
        assert_eq!(spans[1].span_id(), SPAN_ID_2);
        assert!(spans[1].is_open());
        assert_eq!(stack.current().map(Span::span_id), Some(SPAN_ID_2));
    }

    #[test]
    fn test_open_fails_atomically_without_span_id() {
        let mut stack = SpanStack::new();
        let mut controller = MockTracingController::new();
        controller.expect_start_child_span().times(1).return_const(());
        controller.expect_stop_child_span().times(1).return_const(());
        controller.expect_span_id().return_const(None::<String>);

        let result = stack.open("Unit test run", ts(1.0), &controller, &MemoryUsage::default());

        assert_eq!(result.unwrap_err(), ProfilerError::SpanIdUnavailable);
        assert!(stack.is_empty());
        assert!(stack.current().is_none());
    }

    #[test]
    fn test_duplicate_names_get_unique_suffixes() {
        let mut stack = SpanStack::new();
        let controller = controller_returning(&[SPAN_ID, SPAN_ID_2, SPAN_ID, SPAN_ID_2]);
        let memory = MemoryUsage::default();

        for name in ["fetch", "Fetch", "fetch 2", ""] {
            stack.open(name, ts(1.0), &controller, &memory).unwrap();
        }

        let names: Vec<&str> = stack.iter().map(Span::name).collect();
        assert_eq!(names, ["Fetch", "Fetch2", "Fetch22", "Span"]);
    }

    #[test]
    fn test_suffixes_never_share_field_keys() {
        let mut stack = SpanStack::new();
        let controller = controller_returning(&[SPAN_ID, SPAN_ID_2, SPAN_ID]);
        let memory = MemoryUsage::default();

        for name in ["peak", "x", "peak x"] {
            stack.open(name, ts(1.0), &controller, &memory).unwrap();
        }

        let names: Vec<&str> = stack.iter().map(Span::name).collect();
        assert_eq!(names, ["Peak2", "X", "PeakX2"]);

        let keys: HashSet<String> = AGGREGATE_FIELDS
            .iter()
            .map(|key| key.to_string())
            .chain(stack.iter().flat_map(|span| span.fields().map(|(key, _)| key)))
            .collect();
        assert_eq!(keys.len(), AGGREGATE_FIELDS.len() + 3 * 4);
    }

    #[test]
    fn test_at_most_one_open_span() {
        let mut stack = SpanStack::new();
        let controller = controller_returning(&[SPAN_ID, SPAN_ID_2, SPAN_ID]);
        let memory = MemoryUsage::default();

        for (i, name) in ["a", "b", "c"].into_iter().enumerate() {
            stack
                .open(name, Timestamp::from_micros(i as i64 * 1000), &controller, &memory)
                .unwrap();
            assert_eq!(stack.iter().filter(|s| s.is_open()).count(), 1);
        }

        let starts: Vec<i64> = stack.iter().map(|s| s.start_timestamp().as_micros()).collect();
        assert!(starts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_span_fields() {
        let mut stack = SpanStack::new();
        let controller = controller_returning(&[SPAN_ID]);
        let memory = MemoryUsage::new(526_161, 561_489);

        stack
            .open("Unit test run", ts(1734352683.3516), &controller, &memory)
            .unwrap();
        stack.close_previous(ts(1734352684.6526), &controller);

        let span = &stack.spans()[0];
        assert_eq!(span.span_id_key(), "spanIdUnitTestRun");
        let fields: std::collections::HashMap<String, FieldValue> =
            span.fields().into_iter().collect();
        assert_eq!(
            fields["startTimestampUnitTestRun"],
            FieldValue::Float(1734352683.3516)
        );
        assert_eq!(fields["memoryUnitTestRun"], FieldValue::Int(526_161));
        assert_eq!(fields["memoryPeakUnitTestRun"], FieldValue::Int(561_489));
        assert_eq!(fields["executionTimeUnitTestRun"], FieldValue::Float(1.301));
    }
}
