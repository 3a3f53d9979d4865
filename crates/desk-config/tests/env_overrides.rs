use desk_config::DeskConfig;
use figment::Jail;

#[test]
fn env_fills_every_section() {
    Jail::expect_with(|jail| {
        jail.set_env("DESK_DATABASE__HOST", "db.internal");
        jail.set_env("DESK_DATABASE__PORT", "443");
        jail.set_env("DESK_DATABASE__SSL_MODE", "require");
        jail.set_env("DESK_POOL__MAX_OPEN_CONNECTIONS", "40");
        jail.set_env("DESK_SERVER__PORT", "4000");

        let config = DeskConfig::load().expect("config loads");
        assert_eq!(
            config.database.url().as_deref(),
            Some("https://db.internal:443")
        );
        assert_eq!(config.pool.max_open_connections, 40);
        assert_eq!(config.server.port, 4000);
        Ok(())
    });
}

#[test]
fn process_env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file("desk.toml", "[server]\nrequest_timeout_secs = 30\n")?;
        jail.set_env("DESK_SERVER__REQUEST_TIMEOUT_SECS", "7");

        let config = DeskConfig::load().expect("config loads");
        assert_eq!(config.server.request_timeout_secs, 7);
        Ok(())
    });
}

#[test]
fn invalid_env_value_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.set_env("DESK_SERVER__PORT", "not-a-port");
        assert!(DeskConfig::load().is_err());
        Ok(())
    });
}
