//! Welcome messages for joining members.
//!
//! # Responsibilities
//! - Post one welcome message per burst of joins
//! - Verify the configured channel and role exist before posting
//! - Report posting failures to administrators
//!
//! # Design Decisions
//! - Suppression is keyed by time, not by an in-flight flag: a welcome
//!   opens a cooldown window, and joins inside the window are dropped.
//!   A failed post therefore cannot wedge the greeter permanently
//! - The gate is a plain mutex over a timestamp; the critical section
//!   never awaits

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use poise::serenity_prelude::{self as serenity, Mentionable};

use crate::config::WelcomeConfig;
use crate::discord::notifier::AdminNotifier;
use crate::discord::port::ChatPort;
use crate::observability::metrics;

/// Time-keyed single-flight gate for welcome posts.
///
/// `try_acquire` opens the cooldown window and returns `true` exactly once
/// per window, regardless of how the send afterwards goes.
pub struct WelcomeGate {
    cooldown: Duration,
    last_acquired: Mutex<Option<Instant>>,
}

impl WelcomeGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_acquired: Mutex::new(None),
        }
    }

    /// Try to claim the current cooldown window.
    pub fn try_acquire(&self) -> bool {
        let mut last = match self.last_acquired.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        match *last {
            Some(at) if now.duration_since(at) < self.cooldown => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

/// What happened to a member-join event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A welcome message was posted.
    Welcomed,
    /// Dropped: a welcome was already posted inside the cooldown window.
    Suppressed,
    /// The configured welcome channel is unset or missing.
    MissingChannel,
    /// The configured role is unset or missing.
    MissingRole,
    /// The post failed; administrators were notified.
    DeliveryFailed,
}

/// Posts welcome messages when members join.
pub struct Greeter {
    port: Arc<dyn ChatPort>,
    notifier: Arc<AdminNotifier>,
    channel: Option<serenity::ChannelId>,
    role: Option<serenity::RoleId>,
    message: String,
    gate: WelcomeGate,
}

impl Greeter {
    pub fn new(
        port: Arc<dyn ChatPort>,
        notifier: Arc<AdminNotifier>,
        welcome: &WelcomeConfig,
    ) -> Self {
        Self {
            port,
            notifier,
            channel: (welcome.channel_id != 0)
                .then(|| serenity::ChannelId::new(welcome.channel_id)),
            role: (welcome.role_id != 0).then(|| serenity::RoleId::new(welcome.role_id)),
            message: welcome.message.clone(),
            gate: WelcomeGate::new(Duration::from_secs(welcome.cooldown_secs)),
        }
    }

    /// Handle a member join.
    ///
    /// `channel_in_guild` and `role_in_guild` are the cache lookups done by
    /// the gateway layer; both must hold for a welcome to be considered.
    pub async fn handle_join(
        &self,
        member_name: &str,
        member_id: serenity::UserId,
        channel_in_guild: bool,
        role_in_guild: bool,
    ) -> JoinOutcome {
        tracing::info!(member = %member_name, id = %member_id, "Member joined");

        let channel = match self.channel {
            Some(id) if channel_in_guild => id,
            _ => {
                tracing::warn!(
                    "Welcome channel not found; set `welcome.channel_id` to a valid channel"
                );
                return JoinOutcome::MissingChannel;
            }
        };
        let role = match self.role {
            Some(id) if role_in_guild => id,
            _ => {
                tracing::warn!("Welcome role not found; set `welcome.role_id` to a valid role");
                return JoinOutcome::MissingRole;
            }
        };

        if !self.gate.try_acquire() {
            tracing::debug!(member = %member_name, "Welcome suppressed by cooldown window");
            metrics::record_welcome("suppressed");
            return JoinOutcome::Suppressed;
        }

        let text = self.message.replace("{role}", &role.mention().to_string());
        match self.port.channel_message(channel, &text).await {
            Ok(()) => {
                tracing::info!(member = %member_name, channel = %channel, "Welcome posted");
                metrics::record_welcome("posted");
                JoinOutcome::Welcomed
            }
            Err(e) => {
                tracing::error!(member = %member_name, error = %e, "Failed to post welcome");
                metrics::record_welcome("failed");
                self.notifier
                    .notify_admins(&format!("⚠️ Error while welcoming a new member:\n{}", e))
                    .await;
                JoinOutcome::DeliveryFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_admits_once_per_window() {
        let gate = WelcomeGate::new(Duration::from_secs(60));
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
        assert!(!gate.try_acquire());
    }

    #[test]
    fn gate_reopens_after_cooldown() {
        let gate = WelcomeGate::new(Duration::from_millis(20));
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());

        std::thread::sleep(Duration::from_millis(40));
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
    }

    #[test]
    fn acquisition_restarts_the_window() {
        let gate = WelcomeGate::new(Duration::from_millis(30));
        assert!(gate.try_acquire());

        std::thread::sleep(Duration::from_millis(40));
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
    }
}
