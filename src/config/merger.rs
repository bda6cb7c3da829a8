// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Handles merging configurations from different sources with proper precedence.

use super::types::{ConfigFile, ObservabilityConfig};

/// Default configuration values.
pub fn default_config() -> ObservabilityConfig {
    ObservabilityConfig::default()
}

/// Merge multiple configurations with precedence.
///
/// Precedence (highest to lowest):
/// 1. Local config (.ticks.local.json)
/// 2. Workspace config (.ticks.json)
/// 3. Global config (~/.ticks/config.json)
/// 4. Default values
pub fn merge_config(
    global: Option<ConfigFile>,
    workspace: Option<ConfigFile>,
    local: Option<ConfigFile>,
) -> ObservabilityConfig {
    let mut result = default_config();

    for config in [global, workspace, local].into_iter().flatten() {
        apply_config_file(&mut result, &config);
    }

    result
}

fn apply_config_file(result: &mut ObservabilityConfig, config: &ConfigFile) {
    if let Some(level) = config.detail_level {
        result.detail_level = level;
    }

    if let Some(precision) = config.timestamp_precision {
        result.timestamp_precision = precision;
    }

    if let Some(ref name) = config.event_name {
        result.event_name = name.clone();
    }

    if config.log_filter.is_some() {
        result.log_filter = config.log_filter.clone();
    }
}
