//! GPU enumeration utility settings.

use serde::{Deserialize, Serialize};

fn default_command() -> String {
    "nvidia-smi".into()
}

const fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceUtilityConfig {
    /// Executable name or path.
    #[serde(default = "default_command")]
    pub command: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DeviceUtilityConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
