// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Core type definitions shared by the profiler and the event sinks.
//!
//! Metadata attached to an event comes in two flavours:
//!
//! - **Fields**: unstructured values (bool, integer, float, string, null)
//! - **Tags**: indexed values (string, bool, null) used for filtering and grouping
//!
//! This module also holds the two small enumerations used to configure an
//! event pipeline: [`Precision`] for timestamps and [`AnalyticsDetailLevel`].

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Metadata Values
// ============================================================================

/// An unstructured metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Null,
}

impl FieldValue {
    /// Get the value as a float, converting integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get the value as an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(s) => write!(f, "{}", s),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// An indexed metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    String(String),
    Bool(bool),
    Null,
}

impl TagValue {
    /// Get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for TagValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<bool> for TagValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<TagValue>> From<Option<T>> for TagValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Unstructured metadata keyed by field name.
pub type Fields = HashMap<String, FieldValue>;

/// Indexed metadata keyed by tag name.
pub type Tags = HashMap<String, TagValue>;

// ============================================================================
// Timestamp Precision
// ============================================================================

/// Precision of an event timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Hours,
    Minutes,
    Seconds,
    MilliSeconds,
    MicroSeconds,
    #[default]
    NanoSeconds,
}

impl Precision {
    /// Whole units of this precision elapsed since the Unix epoch.
    pub fn timestamp(&self, at: DateTime<Utc>) -> i64 {
        match self {
            Self::Hours => at.timestamp().div_euclid(3600),
            Self::Minutes => at.timestamp().div_euclid(60),
            Self::Seconds => at.timestamp(),
            Self::MilliSeconds => at.timestamp_millis(),
            Self::MicroSeconds => at.timestamp_micros(),
            Self::NanoSeconds => at
                .timestamp_nanos_opt()
                .unwrap_or_else(|| at.timestamp_micros().saturating_mul(1000)),
        }
    }

    /// Short unit suffix, as used by line-protocol style backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hours => "h",
            Self::Minutes => "m",
            Self::Seconds => "s",
            Self::MilliSeconds => "ms",
            Self::MicroSeconds => "us",
            Self::NanoSeconds => "ns",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Analytics Detail Level
// ============================================================================

/// How much analytics detail a host wants to collect.
///
/// `None` disables analytics: it never compares as "at least" anything,
/// not even itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsDetailLevel {
    None,
    #[default]
    Info,
    Detailed,
    Full,
}

impl AnalyticsDetailLevel {
    fn rank(self) -> Option<u8> {
        match self {
            Self::None => None,
            Self::Info => Some(0),
            Self::Detailed => Some(1),
            Self::Full => Some(2),
        }
    }

    /// Check whether this level is at least as detailed as `other`.
    pub fn at_least(self, other: AnalyticsDetailLevel) -> bool {
        match (self.rank(), other.rank()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(a), Some(b)) => a >= b,
        }
    }

    /// Check whether analytics are enabled at all.
    pub fn is_enabled(self) -> bool {
        self != Self::None
    }
}
