// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration module for Ticks.
//!
//! Handles loading, merging, and validation of configuration from multiple sources:
//! - Global config: ~/.ticks/config.json
//! - Workspace config: .ticks.json, .ticks/config.json, or ticks.config.json
//! - Local config: .ticks.local.json (gitignored, for personal overrides)
//!
//! Configuration is merged with precedence (local > workspace > global > defaults).

mod loader;
mod merger;
mod types;

// Re-export public types
pub use loader::{
    find_workspace_root, get_global_config_dir, get_global_config_path, load_config_file,
    load_global_config, load_local_config, load_workspace_config, save_workspace_config,
    CONFIG_FILES, GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILE, LOCAL_CONFIG_FILE,
};

pub use merger::{default_config, merge_config};

pub use types::{ConfigFile, ObservabilityConfig, DEFAULT_EVENT_NAME};

use crate::error::ConfigError;
use std::path::Path;

/// Load and merge all configuration sources for a workspace.
///
/// This is the main entry point for configuration loading.
pub fn load_config(workspace_root: &Path) -> Result<ObservabilityConfig, ConfigError> {
    let global = load_global_config()?;
    let workspace = load_workspace_config(workspace_root)?;
    let local = load_local_config(workspace_root)?;

    let config = merge_config(global, workspace, local);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalyticsDetailLevel;
    use tempfile::TempDir;

    #[test]
    fn test_local_overrides_workspace() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".ticks.json"),
            r#"{"detailLevel": "full", "eventName": "request"}"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join(".ticks.local.json"),
            r#"{"detailLevel": "none"}"#,
        )
        .unwrap();

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.detail_level, AnalyticsDetailLevel::None);
        assert_eq!(config.event_name, "request");
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_empty_event_name_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".ticks.local.json"), r#"{"eventName": ""}"#).unwrap();

        assert!(matches!(
            load_config(temp.path()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
