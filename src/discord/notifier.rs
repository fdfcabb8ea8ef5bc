//! Administrator DM fan-out.
//!
//! # Responsibilities
//! - Deliver operational notices to every configured administrator
//! - Keep one admin's delivery failure from starving the rest
//!
//! # Design Decisions
//! - Failures are logged and swallowed; a notice is advisory, never
//!   load-bearing
//! - Recipients are processed in configuration order

use std::sync::Arc;

use poise::serenity_prelude as serenity;

use crate::config::RosterConfig;
use crate::discord::port::{ChatPort, DeliveryError};
use crate::observability::metrics;

/// Fan-out of operational notices to administrators.
pub struct AdminNotifier {
    port: Arc<dyn ChatPort>,
    admins: Vec<serenity::UserId>,
}

impl AdminNotifier {
    pub fn new(port: Arc<dyn ChatPort>, roster: &RosterConfig) -> Self {
        Self {
            port,
            admins: roster.admins.iter().map(|&id| serenity::UserId::new(id)).collect(),
        }
    }

    /// Send `message` to every administrator, in order.
    ///
    /// Returns how many deliveries succeeded. A failed delivery is logged
    /// and the loop moves on to the next admin.
    pub async fn notify_admins(&self, message: &str) -> usize {
        let mut delivered = 0;

        for &admin in &self.admins {
            match self.port.direct_message(admin, message).await {
                Ok(()) => {
                    delivered += 1;
                    tracing::info!(admin = %admin, "Notified administrator");
                }
                Err(DeliveryError::Resolve(_, reason)) => {
                    tracing::warn!(
                        admin = %admin,
                        reason = %reason,
                        "Administrator could not be resolved"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        admin = %admin,
                        error = %e,
                        "Failed to notify administrator"
                    );
                }
            }
        }

        metrics::record_admin_notice();
        delivered
    }
}
