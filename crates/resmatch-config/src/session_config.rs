//! Session settings

use resmatch_display::ExitPolicy;
use serde::{Deserialize, Serialize};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// What to do with a changed resolution on exit
    #[serde(default)]
    pub on_exit: ExitPolicy,

    /// Probe a mode with the driver before applying it
    #[serde(default = "default_probe")]
    pub probe_before_apply: bool,
}

fn default_probe() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            on_exit: ExitPolicy::Ask,
            probe_before_apply: default_probe(),
        }
    }
}
