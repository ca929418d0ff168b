//! Write-endpoint throttle settings.

use serde::{Deserialize, Serialize};

/// Token-bucket tunables for mutating endpoints.
///
/// The limiter itself is constructed once at startup and carried in the
/// API state; these values only parameterize it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Whether throttling is applied at all.
    #[serde(default)]
    pub enabled: bool,
    /// Bucket capacity (burst size) per caller.
    #[serde(default = "defaults::max_tokens")]
    pub max_tokens: u32,
    /// Tokens restored per second.
    #[serde(default = "defaults::refill_per_second")]
    pub refill_per_second: f64,
    /// Buckets idle longer than this many seconds are swept away.
    #[serde(default = "defaults::idle_eviction")]
    pub idle_eviction_seconds: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_tokens: defaults::max_tokens(),
            refill_per_second: defaults::refill_per_second(),
            idle_eviction_seconds: defaults::idle_eviction(),
        }
    }
}

mod defaults {
    pub(super) fn max_tokens() -> u32 {
        30
    }

    pub(super) fn refill_per_second() -> f64 {
        5.0
    }

    pub(super) fn idle_eviction() -> u64 {
        600
    }
}
