//! Shared utilities for integration testing.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use concierge::discord::port::{ChatPort, DeliveryError, DeliveryResult};

/// One message captured by [`RecordingPort`], in send order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Dm { to: u64, content: String },
    Channel { to: u64, content: String },
}

/// ChatPort that records deliveries instead of talking to a gateway.
///
/// Failures are injected per recipient; failed sends do not appear in the
/// log, mirroring a message that never reached anyone.
pub struct RecordingPort {
    log: Mutex<Vec<Sent>>,
    failing_users: HashSet<u64>,
    unresolvable_users: HashSet<u64>,
    failing_channels: HashSet<u64>,
}

#[allow(dead_code)]
impl RecordingPort {
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            failing_users: HashSet::new(),
            unresolvable_users: HashSet::new(),
            failing_channels: HashSet::new(),
        }
    }

    /// DMs to these users fail at the send step.
    pub fn failing_users(mut self, ids: &[u64]) -> Self {
        self.failing_users.extend(ids.iter().copied());
        self
    }

    /// These users fail at the resolve step.
    pub fn unresolvable_users(mut self, ids: &[u64]) -> Self {
        self.unresolvable_users.extend(ids.iter().copied());
        self
    }

    /// Posts to these channels fail.
    pub fn failing_channels(mut self, ids: &[u64]) -> Self {
        self.failing_channels.extend(ids.iter().copied());
        self
    }

    /// Everything delivered, in order.
    pub fn log(&self) -> Vec<Sent> {
        self.log.lock().unwrap().clone()
    }

    /// Bodies of the DMs a user received, in order.
    pub fn dms_to(&self, id: u64) -> Vec<String> {
        self.log()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Dm { to, content } if to == id => Some(content),
                _ => None,
            })
            .collect()
    }

    /// All channel posts, in order.
    pub fn channel_posts(&self) -> Vec<Sent> {
        self.log()
            .into_iter()
            .filter(|sent| matches!(sent, Sent::Channel { .. }))
            .collect()
    }
}

#[async_trait]
impl ChatPort for RecordingPort {
    async fn direct_message(&self, user: serenity::UserId, content: &str) -> DeliveryResult {
        let id = user.get();
        if self.unresolvable_users.contains(&id) {
            return Err(DeliveryError::Resolve(user, "unknown user".to_string()));
        }
        if self.failing_users.contains(&id) {
            return Err(DeliveryError::Send(
                user,
                "cannot send messages to this user".to_string(),
            ));
        }
        self.log.lock().unwrap().push(Sent::Dm {
            to: id,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn channel_message(
        &self,
        channel: serenity::ChannelId,
        content: &str,
    ) -> DeliveryResult {
        let id = channel.get();
        if self.failing_channels.contains(&id) {
            return Err(DeliveryError::Channel(channel, "missing access".to_string()));
        }
        self.log.lock().unwrap().push(Sent::Channel {
            to: id,
            content: content.to_string(),
        });
        Ok(())
    }
}
