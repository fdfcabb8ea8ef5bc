//! Periodic direct-message rounds.
//!
//! # Responsibilities
//! - DM every configured target on a fixed interval
//! - Report each delivery failure to administrators as it happens
//! - Report one success notice when a round completes clean
//!
//! # Design Decisions
//! - Targets are processed strictly in configuration order; a failure
//!   never skips the targets after it
//! - The task starts at most once per process, no matter how many times
//!   the gateway re-fires its ready event
//! - The first round runs immediately on start, then on the interval

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use poise::serenity_prelude as serenity;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::RosterConfig;
use crate::discord::notifier::AdminNotifier;
use crate::discord::port::ChatPort;
use crate::observability::metrics;

/// Outcome of one DM round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Hourly DM fan-out task.
pub struct DmRound {
    port: Arc<dyn ChatPort>,
    notifier: Arc<AdminNotifier>,
    targets: Vec<serenity::UserId>,
    message: String,
    interval: Duration,
    started: AtomicBool,
}

impl DmRound {
    pub fn new(
        port: Arc<dyn ChatPort>,
        notifier: Arc<AdminNotifier>,
        roster: &RosterConfig,
    ) -> Self {
        Self {
            port,
            notifier,
            targets: roster
                .dm_targets
                .iter()
                .map(|&id| serenity::UserId::new(id))
                .collect(),
            message: roster.dm_message.clone(),
            interval: Duration::from_secs(roster.dm_interval_secs),
            started: AtomicBool::new(false),
        }
    }

    /// Spawn the round loop, once.
    ///
    /// Returns `false` (and spawns nothing) if the loop is already running.
    /// The gateway calls this from its ready handler, which fires again on
    /// every reconnect.
    pub fn start(self: Arc<Self>, shutdown: broadcast::Receiver<()>) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            return false;
        }

        tokio::spawn(async move {
            self.run(shutdown).await;
        });
        true
    }

    async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = self.interval.as_secs(),
            targets = self.targets.len(),
            "DM round task starting"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_round().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("DM round task received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run a single round: DM every target, notify admins about failures
    /// inline, and close with a success notice if nothing failed.
    pub async fn run_round(&self) -> RoundReport {
        let mut report = RoundReport {
            delivered: 0,
            failed: 0,
        };

        for &target in &self.targets {
            match self.port.direct_message(target, &self.message).await {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::info!(target = %target, "Periodic DM delivered");
                    metrics::record_dm("delivered");
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(target = %target, error = %e, "Periodic DM failed");
                    metrics::record_dm("failed");
                    self.notifier
                        .notify_admins(&format!("⚠️ DM delivery error:\n{}", e))
                        .await;
                }
            }
        }

        if report.failed == 0 {
            let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
            self.notifier
                .notify_admins(&format!(
                    "✅ All periodic DMs delivered successfully.\nCompleted at: {}",
                    stamp
                ))
                .await;
        }

        tracing::info!(
            delivered = report.delivered,
            failed = report.failed,
            "DM round complete"
        );
        report
    }
}
