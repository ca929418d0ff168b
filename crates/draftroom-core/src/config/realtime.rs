//! Collaboration hub settings.

use serde::{Deserialize, Serialize};

/// Tunables for the connection registry and per-connection buffers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound frames buffered per connection before drops set in.
    #[serde(default = "defaults::channel_buffer")]
    pub channel_buffer_size: usize,
    /// Connections allowed on one document before the oldest is evicted.
    #[serde(default = "defaults::max_connections_per_document")]
    pub max_connections_per_document: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: defaults::channel_buffer(),
            max_connections_per_document: defaults::max_connections_per_document(),
        }
    }
}

mod defaults {
    pub(super) fn channel_buffer() -> usize {
        256
    }

    pub(super) fn max_connections_per_document() -> usize {
        64
    }
}
