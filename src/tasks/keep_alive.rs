//! Keep-alive self-pinger.
//!
//! # Responsibilities
//! - Periodically GET the bot's own public health endpoint so free-tier
//!   hosting does not idle the process out
//!
//! # Design Decisions
//! - The pinger holds no locks and shares no state with message delivery;
//!   a slow ping can never delay a DM
//! - Ping failures are logged and ignored; the loop always continues

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::KeepAliveConfig;
use crate::observability::metrics;

/// Requests `{base_url}/health` on a fixed interval.
pub struct KeepAlivePinger {
    client: reqwest::Client,
    url: String,
    interval: Duration,
    enabled: bool,
}

impl KeepAlivePinger {
    pub fn new(config: &KeepAliveConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/health", config.base_url.trim_end_matches('/')),
            interval: Duration::from_secs(config.interval_secs),
            enabled: config.enabled,
        })
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.enabled {
            tracing::info!("Keep-alive pinger disabled");
            return;
        }

        tracing::info!(
            url = %self.url,
            interval = self.interval.as_secs(),
            "Keep-alive pinger starting"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.ping_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Keep-alive pinger received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn ping_once(&self) {
        match self.client.get(&self.url).send().await {
            Ok(response) => {
                tracing::info!(status = %response.status(), "Self-ping completed");
                metrics::record_keepalive_ping("ok");
            }
            Err(e) => {
                tracing::error!(error = %e, "Self-ping failed");
                metrics::record_keepalive_ping("error");
            }
        }
    }
}
