//! # desk-config
//!
//! Layered configuration loading for the helpdesk service using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DESK_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`, or `./desk.toml`
//! 3. User-level `~/.config/desk/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DESK_DATABASE__HOST` -> `database.host`,
//! `DESK_POOL__MAX_OPEN_CONNECTIONS` -> `pool.max_open_connections`,
//! `DESK_SERVER__PORT` -> `server.port`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use desk_config::DeskConfig;
//!
//! let config = DeskConfig::load_from(None).expect("config");
//! config.validate().expect("valid config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

mod database;
mod error;
mod server;

pub use database::{DatabaseConfig, PoolConfig};
pub use error::ConfigError;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DESK_";

/// Upper bound on `pool.max_open_connections`.
pub const MAX_OPEN_CONNECTIONS: usize = 10_000;

/// Upper bound on every `*_secs` timeout and interval: one day.
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl DeskConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`load_from`](Self::load_from)
    /// if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(None).extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` support, reading `config_file` instead
    /// of `./desk.toml` when given.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::figment(config_file)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Explicit or project-local config
        let local_path =
            config_file.map_or_else(|| PathBuf::from("desk.toml"), Path::to_path_buf);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.name.trim().is_empty() {
            return Err(ConfigError::invalid("database.name", "must not be empty"));
        }
        if self.pool.max_open_connections == 0 {
            return Err(ConfigError::invalid(
                "pool.max_open_connections",
                "must be at least 1",
            ));
        }
        if self.pool.max_open_connections > MAX_OPEN_CONNECTIONS {
            return Err(ConfigError::invalid(
                "pool.max_open_connections",
                format!("must not exceed {MAX_OPEN_CONNECTIONS}"),
            ));
        }
        if self.pool.max_idle_connections > self.pool.max_open_connections {
            return Err(ConfigError::invalid(
                "pool.max_idle_connections",
                format!(
                    "must not exceed pool.max_open_connections ({})",
                    self.pool.max_open_connections
                ),
            ));
        }
        for (field, secs) in [
            ("pool.connect_timeout_secs", self.pool.connect_timeout_secs),
            ("server.request_timeout_secs", self.server.request_timeout_secs),
            ("server.ping_interval_secs", self.server.ping_interval_secs),
        ] {
            if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be between 1 and {MAX_TIMEOUT_SECS}"),
                ));
            }
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("desk").join("config.toml"))
    }
}
