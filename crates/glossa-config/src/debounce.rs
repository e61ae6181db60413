use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_delay_ms() -> u64 {
    300
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet period before an interactive lookup fires
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

impl DebounceConfig {
    pub fn new() -> Self {
        let delay_ms = env::var("GLOSSA_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_delay_ms);

        Self { delay_ms }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
