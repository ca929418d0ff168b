//! Log output settings.

use serde::{Deserialize, Serialize};

/// Filter directive and output format for tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `draftroom=debug,sqlx=warn`.
    #[serde(default = "defaults::level")]
    pub level: String,
    /// `pretty` for humans, `json` for log shippers.
    #[serde(default = "defaults::format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
            format: defaults::format(),
        }
    }
}

mod defaults {
    pub(super) fn level() -> String {
        "info".to_string()
    }

    pub(super) fn format() -> String {
        "pretty".to_string()
    }
}
