//! showrun - main entry point
//!
//! Starts the playback engine actor, the integration dispatcher and the
//! HTTP/SSE server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use showrun_common::models::load_rundown_file;
use showrun_common::time::SystemTimeSource;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showrun_engine::api::{self, AppContext};
use showrun_engine::config::EngineConfig;
use showrun_engine::integrations::{HttpClient, IntegrationDispatcher, OscClient};
use showrun_engine::playback::{spawn_engine, PlaybackEngine};
use showrun_engine::state::SharedState;

/// Command-line arguments for showrun
#[derive(Parser, Debug)]
#[command(name = "showrun")]
#[command(about = "Show-control countdown engine")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, env = "SHOWRUN_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "SHOWRUN_PORT")]
    port: Option<u16>,

    /// Rundown JSON file to load at startup (overrides config)
    #[arg(short, long)]
    rundown: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = EngineConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "showrun_engine={level},showrun={level},showrun_common={level},tower_http=info",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting showrun v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let port = args.port.unwrap_or(config.port);

    // Outbound integrations
    let osc = OscClient::connect(&config.osc)
        .await
        .context("Failed to set up OSC output")?;
    let http = HttpClient::new().context("Failed to set up HTTP client")?;
    let (dispatcher, _dispatcher_task) = IntegrationDispatcher::spawn(osc, http);

    // Engine
    let state = Arc::new(SharedState::new());
    let mut engine = PlaybackEngine::new(
        Arc::new(SystemTimeSource),
        Arc::new(dispatcher),
        state.clone(),
        config.http.clone(),
    );

    if let Some(path) = args.rundown.as_ref().or(config.rundown.as_ref()) {
        match load_rundown_file(path) {
            Ok(events) => {
                info!("Loaded {} cues from {}", events.len(), path.display());
                engine.setup_with_event_list(events);
            }
            Err(e) => warn!("Starting with an empty rundown: {}", e),
        }
    }

    let (handle, engine_task) = spawn_engine(engine, config.tick_interval());

    let ctx = AppContext {
        engine: handle,
        state,
    };

    if let Err(e) = api::run(ctx, port, shutdown_signal()).await {
        error!("HTTP server failed: {}", e);
        return Err(e).context("Server error");
    }

    engine_task.abort();

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
