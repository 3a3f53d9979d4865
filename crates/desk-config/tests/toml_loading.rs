//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var and file manipulation.

use desk_config::DeskConfig;
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};

#[test]
fn loads_database_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
host = "db.internal"
port = 8081
user = "desk"
password = "secret-token"
name = "helpdesk"
ssl_mode = "disable"
"#,
        )?;

        let config: DeskConfig = Figment::from(Serialized::defaults(DeskConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, Some(8081));
        assert_eq!(config.database.user, "desk");
        assert_eq!(config.database.password, "secret-token");
        assert_eq!(config.database.name, "helpdesk");
        assert!(!config.database.tls_enabled());
        assert_eq!(
            config.database.url().as_deref(),
            Some("http://db.internal:8081")
        );
        Ok(())
    });
}

#[test]
fn loads_pool_and_server_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[pool]
max_open_connections = 8
max_idle_connections = 2
conn_max_lifetime_secs = 60
connect_timeout_secs = 3

[server]
port = 9090
request_timeout_secs = 2
allowed_origins = ["https://desk.example.com"]
"#,
        )?;

        let config: DeskConfig = Figment::from(Serialized::defaults(DeskConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.pool.max_open_connections, 8);
        assert_eq!(config.pool.max_idle_connections, 2);
        assert_eq!(config.pool.conn_max_lifetime_secs, 60);
        assert_eq!(config.pool.connect_timeout_secs, 3);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.request_timeout_secs, 2);
        assert_eq!(config.server.allowed_origins, vec!["https://desk.example.com"]);
        // Untouched fields keep their defaults
        assert_eq!(config.server.ping_interval_secs, 10);
        config.validate().unwrap();
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_figment_chain() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "desk.toml",
            r#"
[database]
name = "from-project.db"
"#,
        )?;

        let config: DeskConfig = DeskConfig::figment(None).extract()?;
        assert_eq!(config.database.name, "from-project.db");
        Ok(())
    });
}

#[test]
fn explicit_config_file_replaces_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file("desk.toml", "[server]\nport = 1111\n")?;
        jail.create_file("custom.toml", "[server]\nport = 2222\n")?;

        let config: DeskConfig =
            DeskConfig::figment(Some(std::path::Path::new("custom.toml"))).extract()?;
        assert_eq!(config.server.port, 2222);
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.set_env("DESK_DATABASE__HOST", "from-env.internal");

        jail.create_file(
            "config.toml",
            r#"
[database]
host = "from-toml.internal"
password = "toml-token"
"#,
        )?;

        let config: DeskConfig = Figment::from(Serialized::defaults(DeskConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("DESK_").split("__"))
            .extract()?;

        // Env should win over TOML
        assert_eq!(config.database.host, "from-env.internal");
        // TOML value not overridden by env should remain
        assert_eq!(config.database.password, "toml-token");
        Ok(())
    });
}

/// Documents the figment gotcha: typo'd env var keys are silently ignored.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("DESK_DATABASE__HOTS", "typo.internal");

        let config: DeskConfig = DeskConfig::figment(None).extract()?;

        assert!(
            config.database.host.is_empty(),
            "typo'd env var should be silently ignored by figment"
        );
        Ok(())
    });
}
