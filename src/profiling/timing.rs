// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Timestamps, execution times and clocks.
//!
//! Timestamps are kept as integer microseconds since the Unix epoch and
//! execution times as integer ten-thousandths of a second, so repeated span
//! boundaries never accumulate floating-point error. Conversion to `f64`
//! happens once, when a value is written into an event field.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

const MICROS_PER_SEC: i64 = 1_000_000;

/// Fractional digits kept by an [`ExecutionTime`].
pub const EXECUTION_TIME_SCALE: u32 = 4;

const TICKS_PER_SEC: i64 = 10_000;
const MICROS_PER_TICK: i64 = MICROS_PER_SEC / TICKS_PER_SEC;

/// Wall-clock instant with microsecond resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    micros: i64,
}

impl Timestamp {
    pub const fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    /// Build from fractional seconds, rounding to the nearest microsecond.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self {
            micros: (secs * MICROS_PER_SEC as f64).round() as i64,
        }
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            micros: at.timestamp_micros(),
        }
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub const fn as_micros(&self) -> i64 {
        self.micros
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.micros as f64 / MICROS_PER_SEC as f64
    }

    /// Time elapsed from `start` to `self`, truncated to four fractional digits.
    pub fn elapsed_since(&self, start: Timestamp) -> ExecutionTime {
        ExecutionTime::from_ticks((self.micros - start.micros) / MICROS_PER_TICK)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.micros < 0 { "-" } else { "" };
        let abs = self.micros.unsigned_abs();
        write!(
            f,
            "{}{}.{:06}",
            sign,
            abs / MICROS_PER_SEC as u64,
            abs % MICROS_PER_SEC as u64
        )
    }
}

/// Elapsed time as a fixed-point decimal with four fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExecutionTime {
    ticks: i64,
}

impl ExecutionTime {
    pub const ZERO: Self = Self { ticks: 0 };

    /// Build from ten-thousandths of a second.
    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_SEC as f64
    }

    pub fn is_zero(&self) -> bool {
        self.ticks == 0
    }
}

impl fmt::Display for ExecutionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.ticks < 0 { "-" } else { "" };
        let abs = self.ticks.unsigned_abs();
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            abs / TICKS_PER_SEC as u64,
            abs % TICKS_PER_SEC as u64,
            width = EXECUTION_TIME_SCALE as usize
        )
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock that only moves when told to. Used for deterministic replay.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            micros: AtomicI64::new(start.as_micros()),
        }
    }

    pub fn set(&self, at: Timestamp) {
        self.micros.store(at.as_micros(), Ordering::SeqCst);
    }

    pub fn advance_micros(&self, micros: i64) {
        self.micros.fetch_add(micros, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.micros.load(Ordering::SeqCst))
    }
}
