//! HTTP server for the health endpoint.
//!
//! # Responsibilities
//! - Create the Axum router with the health handler
//! - Wire up middleware (access log, timeout)
//! - Bind the server to a listener and serve until shutdown
//!
//! # Design Decisions
//! - `/health` is exempt from the access log; the keep-alive pinger and
//!   platform probes would otherwise flood it
//! - Guild count is a shared atomic written by the gateway layer, so the
//!   handler never touches the chat client

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;

use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process start time, for the uptime field.
    pub started_at: Instant,
    /// Number of guilds the bot is currently in, written by the gateway.
    pub guild_count: Arc<AtomicUsize>,
}

/// Health report returned by `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// Seconds since process start.
    pub uptime: f64,
    pub guild_count: usize,
    /// Current UTC time, RFC 3339.
    pub time: String,
}

/// HTTP server exposing the bot's health.
pub struct HealthServer {
    router: Router,
}

impl HealthServer {
    /// Create a new server with its routes and middleware wired up.
    pub fn new(state: AppState) -> Self {
        let router = Router::new()
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(middleware::from_fn(access_log))
            .layer(TimeoutLayer::new(Duration::from_secs(10)));

        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    tracing::debug!("Health check endpoint accessed");
    metrics::record_health_request();

    Json(HealthStatus {
        status: "ok",
        uptime: state.started_at.elapsed().as_secs_f64(),
        guild_count: state.guild_count.load(Ordering::Relaxed),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

/// Access log for everything except the health endpoint.
async fn access_log(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    if path != "/health" {
        tracing::info!(
            client = %addr,
            method = %method,
            path = %path,
            status = %response.status(),
            "HTTP request"
        );
    }

    response
}
