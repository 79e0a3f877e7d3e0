//! Driver diagnostic settings

use resmatch_display::DriverInfoProbe;
use resmatch_display::driver::{DEFAULT_ARGS, DEFAULT_PROGRAM, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ConfigError;

/// Inventory command used to describe the video adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Seconds before the command is killed
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_args() -> Vec<String> {
    DEFAULT_ARGS.iter().map(|a| a.to_string()).collect()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DiagnosticsConfig {
    /// Build the probe described by this section
    pub fn probe(&self) -> DriverInfoProbe {
        DriverInfoProbe::new(
            self.program.clone(),
            self.args.iter().cloned(),
            Duration::from_secs(self.timeout_secs),
        )
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::Invalid("diagnostics.program is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("diagnostics.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_probe_matches_display_crate() {
        let probe = DiagnosticsConfig::default().probe();
        assert_eq!(probe.program(), "wmic");
        assert_eq!(probe.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_validate() {
        let mut config = DiagnosticsConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = DiagnosticsConfig::default();
        config.program = "  ".into();
        assert!(config.validate().is_err());
    }
}
