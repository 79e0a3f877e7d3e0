//! Display settings

use resmatch_display::shortcuts::DEFAULT_SHORTCUTS;
use resmatch_display::{DEFAULT_MIN_WIDTH, DisplayMode};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Narrowest mode offered to the user
    #[serde(default = "default_min_width")]
    pub min_width: u32,

    /// The technician's own resolutions, offered as one-key shortcuts
    #[serde(default = "default_shortcuts")]
    pub shortcuts: Vec<DisplayMode>,
}

fn default_min_width() -> u32 {
    DEFAULT_MIN_WIDTH
}

fn default_shortcuts() -> Vec<DisplayMode> {
    DEFAULT_SHORTCUTS.to_vec()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            shortcuts: default_shortcuts(),
        }
    }
}

impl DisplayConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.min_width == 0 {
            return Err(ConfigError::Invalid("display.min_width must be positive".into()));
        }

        // Shortcuts are bound to keys 1-9
        if self.shortcuts.len() > 9 {
            return Err(ConfigError::Invalid(format!(
                "display.shortcuts has {} entries, at most 9 are supported",
                self.shortcuts.len()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.min_width, 800);
        assert_eq!(config.shortcuts[0], DisplayMode::new(1366, 768));
    }

    #[test]
    fn test_validate() {
        let mut config = DisplayConfig::default();
        config.min_width = 0;
        assert!(config.validate().is_err());

        let mut config = DisplayConfig::default();
        config.shortcuts = vec![DisplayMode::new(1280, 720); 10];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_section() {
        let config: DisplayConfig = toml::from_str("min_width = 1024").unwrap();
        assert_eq!(config.min_width, 1024);
        assert_eq!(config.shortcuts.len(), 6);
    }
}
