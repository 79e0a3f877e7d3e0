//! Configuration management for resmatch
//!
//! Handles the width filter, technician shortcuts, the driver diagnostic command
//! and the exit policy. Configuration is TOML; a system-wide file is overlaid by
//! the per-user file, and defaults fill anything neither sets.

mod diagnostics;
mod display_config;
mod session_config;

pub use diagnostics::DiagnosticsConfig;
pub use display_config::DisplayConfig;
pub use session_config::SessionConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Directory name under the per-user and machine-wide data roots
pub const APP_DIR: &str = "resmatch";
pub const CONFIG_FILE: &str = "config.toml";

/// Main resmatch configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResmatchConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl ResmatchConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let paths: Vec<PathBuf> = [system_config_path(), user_config_path()]
            .into_iter()
            .flatten()
            .filter(|p| p.exists())
            .collect();

        if paths.is_empty() {
            tracing::debug!("No configuration file found, using defaults");
            return Ok(Self::default());
        }

        Self::load_layered(&paths)
    }

    /// Load several files, later files overriding earlier ones key by key
    pub fn load_layered(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        for path in paths {
            let contents = std::fs::read_to_string(path)?;
            let layer: toml::Value = toml::from_str(&contents)?;
            merge_toml(&mut merged, layer);
            tracing::debug!("Loaded configuration layer {}", path.display());
        }

        let config: Self = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the rest of the program cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.display.validate()?;
        self.diagnostics.validate()?;
        Ok(())
    }
}

/// Per-user configuration file (`%APPDATA%\resmatch\config.toml`)
pub fn user_config_path() -> Option<PathBuf> {
    data_root("APPDATA").map(|root| root.join(APP_DIR).join(CONFIG_FILE))
}

/// Machine-wide configuration file (`%PROGRAMDATA%\resmatch\config.toml`)
pub fn system_config_path() -> Option<PathBuf> {
    data_root("PROGRAMDATA").map(|root| root.join(APP_DIR).join(CONFIG_FILE))
}

fn data_root(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Helper function to merge TOML values
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
