//! Backing store configuration: the data-source descriptor and pool bounds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_name() -> String {
    "tickets.db".to_string()
}

fn default_ssl_mode() -> String {
    "require".to_string()
}

/// Where the `tickets` relation lives.
///
/// With an empty `host` the database is a local libSQL file at `name`.
/// Otherwise it is a remote libSQL server reached over HTTP(S), authenticated
/// with `password` as the bearer token.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Server host name. Empty for a local database file.
    #[serde(default)]
    pub host: String,

    /// Server port. Omitted from the URL when unset.
    #[serde(default)]
    pub port: Option<u16>,

    /// Account name. The libSQL protocol authenticates by token only, so
    /// this is informational.
    #[serde(default)]
    pub user: String,

    /// Auth token for a remote server.
    #[serde(default)]
    pub password: String,

    /// Database name, or the file path of a local database.
    #[serde(default = "default_name")]
    pub name: String,

    /// TLS mode. `disable` selects plain HTTP, anything else HTTPS.
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: None,
            user: String::new(),
            password: String::new(),
            name: default_name(),
            ssl_mode: default_ssl_mode(),
        }
    }
}

impl DatabaseConfig {
    /// Local database file pointed at by `name`.
    #[must_use]
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            name: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        self.host.trim().is_empty()
    }

    #[must_use]
    pub fn tls_enabled(&self) -> bool {
        !self.ssl_mode.eq_ignore_ascii_case("disable")
    }

    /// Remote server URL, or `None` for a local database.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        if self.is_local() {
            return None;
        }
        let scheme = if self.tls_enabled() { "https" } else { "http" };
        let host = self.host.trim();
        Some(match self.port {
            Some(port) => format!("{scheme}://{host}:{port}"),
            None => format!("{scheme}://{host}"),
        })
    }
}

const fn default_max_open() -> usize {
    25
}

const fn default_max_idle() -> usize {
    10
}

const fn default_max_lifetime_secs() -> u64 {
    300
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

/// Process-wide connection pool bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    /// Ceiling on concurrently open connections.
    #[serde(default = "default_max_open")]
    pub max_open_connections: usize,

    /// Ceiling on connections kept idle for reuse.
    #[serde(default = "default_max_idle")]
    pub max_idle_connections: usize,

    /// Connections older than this are closed instead of reused.
    #[serde(default = "default_max_lifetime_secs")]
    pub conn_max_lifetime_secs: u64,

    /// Bound on establishing and verifying a connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_open_connections: default_max_open(),
            max_idle_connections: default_max_idle(),
            conn_max_lifetime_secs: default_max_lifetime_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub const fn conn_max_lifetime(&self) -> Duration {
        Duration::from_secs(self.conn_max_lifetime_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local_file() {
        let config = DatabaseConfig::default();
        assert!(config.is_local());
        assert_eq!(config.name, "tickets.db");
        assert_eq!(config.url(), None);
    }

    #[test]
    fn remote_url_uses_https_by_default() {
        let config = DatabaseConfig {
            host: "db.internal".into(),
            port: Some(8081),
            ..Default::default()
        };
        assert!(!config.is_local());
        assert_eq!(config.url().as_deref(), Some("https://db.internal:8081"));
    }

    #[test]
    fn ssl_mode_disable_selects_http() {
        let config = DatabaseConfig {
            host: "localhost".into(),
            ssl_mode: "disable".into(),
            ..Default::default()
        };
        assert_eq!(config.url().as_deref(), Some("http://localhost"));
    }

    #[test]
    fn pool_defaults() {
        let pool = PoolConfig::default();
        assert_eq!(pool.max_open_connections, 25);
        assert_eq!(pool.max_idle_connections, 10);
        assert_eq!(pool.conn_max_lifetime(), Duration::from_secs(300));
        assert_eq!(pool.connect_timeout(), Duration::from_secs(10));
    }
}
