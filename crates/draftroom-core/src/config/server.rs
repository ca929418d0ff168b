//! HTTP server and CORS settings.

use serde::{Deserialize, Serialize};

/// Bind address, shutdown grace, and CORS policy for the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "defaults::host")]
    pub host: String,
    /// Port to bind.
    #[serde(default = "defaults::port")]
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown.
    #[serde(default = "defaults::shutdown_grace")]
    pub shutdown_grace_seconds: u64,
    /// Cross-origin policy.
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Cross-origin request policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API; `["*"]` opens it up for development.
    #[serde(default = "defaults::allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Methods allowed cross-origin.
    #[serde(default = "defaults::allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// Seconds browsers may cache a preflight answer.
    #[serde(default = "defaults::max_age")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: defaults::allowed_origins(),
            allowed_methods: defaults::allowed_methods(),
            max_age_seconds: defaults::max_age(),
        }
    }
}

mod defaults {
    pub(super) fn host() -> String {
        "0.0.0.0".to_string()
    }

    pub(super) fn port() -> u16 {
        8080
    }

    pub(super) fn shutdown_grace() -> u64 {
        30
    }

    pub(super) fn allowed_origins() -> Vec<String> {
        vec!["*".to_string()]
    }

    pub(super) fn allowed_methods() -> Vec<String> {
        ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub(super) fn max_age() -> u64 {
        3600
    }
}
