//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default log level when `ASTRAL_LOG` is unset.
fn default_log_level() -> String {
    "warn".to_string()
}

/// Default lookback for upcoming meetings, so late joiners still see a class
/// that has already started.
const fn default_meeting_join_window_secs() -> i64 {
    3600
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Fallback tracing filter.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How far back, in seconds, the upcoming-meetings listing reaches.
    #[serde(default = "default_meeting_join_window_secs")]
    pub meeting_join_window_secs: i64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            meeting_join_window_secs: default_meeting_join_window_secs(),
        }
    }
}
