// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Event logging backends.
//!
//! An [`EventLogger`] hands out [`Event`]s; a profiler fills one event and
//! records it once. Two backends ship with the crate:
//!
//! - [`NullEventLogger`]: discards everything, for turning observability off
//! - [`MemoryEventLogger`]: keeps recorded events in memory and reports them via `tracing`
//!
//! Hosts pick one at construction time; call sites never branch on it.

mod event;
mod memory;
mod null;

pub use event::{BoxedEvent, Event, EventLogger};
pub use memory::{EventRecord, MemoryEvent, MemoryEventLogger};
pub use null::{NullEvent, NullEventLogger};

#[cfg(test)]
pub use event::{MockEvent, MockEventLogger};
