use anyhow::Context;
use desk_config::DeskConfig;

use crate::cli::Cli;

/// Load `.env`, the config layers and CLI overrides, then validate.
pub fn load_config(cli: &Cli) -> anyhow::Result<DeskConfig> {
    let mut config = DeskConfig::load_from(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("failed to load configuration from {}", path.display()),
            None => "failed to load configuration".to_string(),
        }
    })?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}
