//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define bot metrics (deliveries, failures, welcomes, pings)
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `concierge_dms_total` (counter): direct messages by outcome
//! - `concierge_admin_notices_total` (counter): admin fan-out rounds
//! - `concierge_welcomes_total` (counter): welcome posts by outcome
//! - `concierge_keepalive_pings_total` (counter): self-pings by outcome
//! - `concierge_health_requests_total` (counter): health endpoint hits
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Outcome label instead of separate success/failure metric families

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to bind is logged and otherwise ignored: the bot is fully
/// functional without a scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record one direct-message delivery attempt.
pub fn record_dm(outcome: &'static str) {
    counter!("concierge_dms_total", "outcome" => outcome).increment(1);
}

/// Record one admin fan-out round.
pub fn record_admin_notice() {
    counter!("concierge_admin_notices_total").increment(1);
}

/// Record one welcome attempt.
pub fn record_welcome(outcome: &'static str) {
    counter!("concierge_welcomes_total", "outcome" => outcome).increment(1);
}

/// Record one keep-alive self-ping.
pub fn record_keepalive_ping(outcome: &'static str) {
    counter!("concierge_keepalive_pings_total", "outcome" => outcome).increment(1);
}

/// Record one hit on the health endpoint.
pub fn record_health_request() {
    counter!("concierge_health_requests_total").increment(1);
}
