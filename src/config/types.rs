// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Defines the structure of config files and of the resolved configuration,
//! supporting JSON and YAML formats.

use serde::{Deserialize, Serialize};

use crate::controller::SharedController;
use crate::error::ConfigError;
use crate::event_logging::{EventLogger, NullEventLogger};
use crate::profiling::Profiler;
use crate::telemetry::TelemetryConfig;
use crate::types::{AnalyticsDetailLevel, Precision};

/// Default name of profiling events.
pub const DEFAULT_EVENT_NAME: &str = "profile";

/// Observability configuration as written in a config file.
/// Every field is optional; missing fields fall back to lower-precedence sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// How much analytics detail to collect ("none" disables events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<AnalyticsDetailLevel>,

    /// Precision of recorded event timestamps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_precision: Option<Precision>,

    /// Name given to profiling events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,

    /// Log filter directive, e.g. "ticks=debug"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

/// Fully resolved observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservabilityConfig {
    pub detail_level: AnalyticsDetailLevel,
    pub timestamp_precision: Precision,
    pub event_name: String,
    pub log_filter: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            detail_level: AnalyticsDetailLevel::default(),
            timestamp_precision: Precision::default(),
            event_name: DEFAULT_EVENT_NAME.to_string(),
            log_filter: None,
        }
    }
}

impl ObservabilityConfig {
    /// Check that the resolved values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "eventName".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Whether events should be recorded at all.
    pub fn is_enabled(&self) -> bool {
        self.detail_level.is_enabled()
    }

    /// Pick the event logger to use: `logger` when analytics are enabled,
    /// a [`NullEventLogger`] otherwise.
    pub fn select_logger<'a>(&self, logger: &'a dyn EventLogger) -> &'a dyn EventLogger {
        if self.is_enabled() {
            logger
        } else {
            &NullEventLogger
        }
    }

    /// Build a profiler for one operation, honouring the detail level,
    /// event name and timestamp precision.
    pub fn profiler(&self, logger: &dyn EventLogger, controller: SharedController) -> Profiler {
        let event = self.select_logger(logger).new_event(&self.event_name);
        Profiler::builder(event, controller)
            .precision(self.timestamp_precision)
            .build()
    }

    /// Logging setup matching this configuration.
    pub fn telemetry_config(&self) -> TelemetryConfig {
        match &self.log_filter {
            Some(filter) => TelemetryConfig::default().with_filter(filter.clone()),
            None => TelemetryConfig::default(),
        }
    }
}
