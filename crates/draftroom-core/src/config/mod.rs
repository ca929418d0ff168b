//! Configuration schemas, one sub-module per section.
//!
//! The merged sources are, in override order: `config/default.toml`, the
//! `config/{env}.toml` overlay, then `DRAFTROOM`-prefixed environment
//! variables (`DRAFTROOM_DATABASE__URL` and so on).

pub mod logging;
pub mod realtime;
pub mod server;
pub mod throttle;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::realtime::RealtimeConfig;
use self::server::ServerConfig;
use self::throttle::ThrottleConfig;

use crate::error::AppError;

/// The deserialization target for the merged configuration sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Collaboration hub settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Write-endpoint throttle settings.
    #[serde(default)]
    pub throttle: ThrottleConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load and merge configuration for the given environment name.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let merged = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DRAFTROOM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(merged.try_deserialize()?)
    }
}

/// PostgreSQL pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "defaults::max_connections")]
    pub max_connections: u32,
    /// Connections kept open even when idle.
    #[serde(default = "defaults::min_connections")]
    pub min_connections: u32,
    /// How long to wait for a connection before giving up, in seconds.
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connections are dropped after this many seconds.
    #[serde(default = "defaults::idle_timeout")]
    pub idle_timeout_seconds: u64,
}

mod defaults {
    pub(super) fn max_connections() -> u32 {
        20
    }

    pub(super) fn min_connections() -> u32 {
        5
    }

    pub(super) fn connect_timeout() -> u64 {
        10
    }

    pub(super) fn idle_timeout() -> u64 {
        300
    }
}
