//! HTTP server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_request_timeout_secs() -> u64 {
    5
}

const fn default_ping_interval_secs() -> u64 {
    10
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:4000".to_string(),
    ]
}

/// Default CORS preflight cache: 12 hours.
const fn default_cors_max_age_secs() -> u64 {
    12 * 60 * 60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Deadline applied to every store operation a request triggers.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Interval between background liveness probes of the backing store.
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,

    /// Origins allowed by CORS.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_cors_max_age_secs")]
    pub cors_max_age_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            ping_interval_secs: default_ping_interval_secs(),
            allowed_origins: default_allowed_origins(),
            cors_max_age_secs: default_cors_max_age_secs(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    #[must_use]
    pub const fn cors_max_age(&self) -> Duration {
        Duration::from_secs(self.cors_max_age_secs)
    }
}
