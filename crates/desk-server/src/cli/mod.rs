use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI parser for the `deskd` binary.
#[derive(Debug, Parser)]
#[command(name = "deskd", version, about = "Helpdesk ticket service")]
pub struct Cli {
    /// Config file to read instead of ./desk.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen port (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}
