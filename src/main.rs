//! Concierge Bot (v1)
//!
//! A single-process community bot built with Tokio, Poise and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!        Discord gateway
//!              │ events                      sends (serialized)
//!              ▼                                    ▲
//!      ┌──────────────┐   member joins    ┌────────┴─────┐
//!      │   gateway    │──────────────────▶│   greeter    │
//!      │   handler    │                   └──────────────┘
//!      │              │   ready (once)    ┌──────────────┐   failures    ┌──────────┐
//!      │              │──────────────────▶│   dm round   │──────────────▶│ notifier │
//!      └──────┬───────┘                   └──────────────┘   summaries   └──────────┘
//!             │ guild count
//!             ▼
//!      ┌──────────────┐    GET /health    ┌──────────────┐
//!      │    health    │◀──────────────────│  keep-alive  │
//!      │    server    │                   │    pinger    │
//!      └──────────────┘                   └──────────────┘
//!
//!      Cross-cutting: config, lifecycle (shutdown/restart), observability
//! ```
//!
//! Restart is cooperative: the restart command drains the gateway and the
//! process exits with a dedicated status code for the supervisor to act on.

use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concierge::config::{self, BotConfig, ConfigError};
use concierge::discord;
use concierge::http::{AppState, HealthServer};
use concierge::lifecycle::{Shutdown, RESTART_EXIT_CODE};
use concierge::tasks::KeepAlivePinger;

/// Community concierge bot: welcomes, periodic DMs, health endpoint.
#[derive(Parser)]
#[command(name = "concierge", version)]
struct Cli {
    /// Path to the TOML config file. Falls back to $CONCIERGE_CONFIG, then
    /// ./concierge.toml if present, then built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "concierge=debug,serenity=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("concierge v0.1.0 starting");

    let cli = Cli::parse();
    let config = resolve_config(cli.config)?;

    tracing::info!(
        http_port = config.http.port,
        admins = config.roster.admins.len(),
        dm_targets = config.roster.dm_targets.len(),
        dm_interval_secs = config.roster.dm_interval_secs,
        keep_alive = config.keep_alive.enabled,
        "Configuration loaded"
    );

    // The token is the one piece of config the bot cannot run without.
    let token = match config::read_token() {
        Ok(token) => {
            tracing::info!(token = %config::redact_token(&token), "Gateway token loaded");
            token
        }
        Err(e) => {
            tracing::error!(error = %e, "Cannot start without a gateway token");
            std::process::exit(1);
        }
    };

    // Initialize metrics exporter
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            concierge::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let started_at = Instant::now();
    let shutdown = Arc::new(Shutdown::new());
    let guild_count = Arc::new(AtomicUsize::new(0));

    // Bind the health endpoint listener
    let listener = TcpListener::bind(("0.0.0.0", config.http.port)).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        "Listening for health checks"
    );

    let server = HealthServer::new(AppState {
        started_at,
        guild_count: Arc::clone(&guild_count),
    });
    let server_shutdown = shutdown.subscribe();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run(listener, server_shutdown).await {
            tracing::error!(error = %e, "HTTP server error");
        }
    });

    let pinger = KeepAlivePinger::new(&config.keep_alive)?;
    let pinger_shutdown = shutdown.subscribe();
    let pinger_handle = tokio::spawn(async move {
        pinger.run(pinger_shutdown).await;
    });

    // Run the gateway client until Ctrl+C or the restart command drains it
    let config = Arc::new(config);
    let gateway_result = discord::gateway::run(
        &token,
        Arc::clone(&config),
        Arc::clone(&guild_count),
        Arc::clone(&shutdown),
    )
    .await;

    // Stop the background tasks regardless of how the gateway ended
    shutdown.trigger();
    let _ = tokio::join!(server_handle, pinger_handle);

    if let Err(e) = gateway_result {
        tracing::error!(error = %e, "Gateway client error");
        return Err(e.into());
    }

    if shutdown.restart_requested() {
        tracing::info!(
            exit_code = RESTART_EXIT_CODE,
            "Restart requested, exiting for supervisor relaunch"
        );
        std::process::exit(RESTART_EXIT_CODE);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Pick and load the configuration source.
///
/// Explicit paths (flag or environment) must exist; the implicit default
/// path is allowed to be absent.
fn resolve_config(cli_path: Option<PathBuf>) -> Result<BotConfig, ConfigError> {
    let explicit = cli_path.or_else(|| std::env::var_os("CONCIERGE_CONFIG").map(PathBuf::from));

    match explicit {
        Some(path) => {
            let config = config::load_config(&path)?;
            tracing::info!(path = %path.display(), "Configuration file loaded");
            Ok(config)
        }
        None => {
            let default_path = PathBuf::from("concierge.toml");
            if default_path.exists() {
                let config = config::load_config(&default_path)?;
                tracing::info!(path = %default_path.display(), "Configuration file loaded");
                Ok(config)
            } else {
                tracing::info!("No configuration file found, using defaults");
                config::default_config()
            }
        }
    }
}
