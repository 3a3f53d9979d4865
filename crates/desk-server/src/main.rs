use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use desk_db::DeskDb;
use tokio_util::sync::CancellationToken;

mod bootstrap;
mod cli;
mod cors;
mod error;
mod routes;
mod state;
mod supervisor;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("deskd error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = bootstrap::load_config(&cli)?;

    let db = DeskDb::connect(config.database.clone(), config.pool.clone())
        .await
        .context("failed to connect to database")?;
    let db = Arc::new(db);

    let shutdown = CancellationToken::new();
    let supervisor = supervisor::spawn(
        Arc::clone(&db),
        config.server.ping_interval(),
        shutdown.clone(),
    );

    let state = state::AppState::new(Arc::clone(&db), config.server.request_timeout());
    let app = routes::router(state, cors::cors_layer(&config.server));

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("server error");

    shutdown.cancel();
    if let Err(error) = supervisor.await {
        tracing::warn!(%error, "liveness supervisor panicked");
    }
    db.close();
    tracing::info!("shutdown complete");
    served
}

/// Resolves on ctrl-c, or when something else cancels `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    tokio::select! {
        () = ctrl_c => tracing::info!("shutting down"),
        () = shutdown.cancelled() => {}
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DESK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
