//! Outbound message delivery seam.
//!
//! # Responsibilities
//! - Define the [`ChatPort`] trait every sender goes through
//! - Implement it against the live gateway HTTP client
//!
//! # Design Decisions
//! - The trait keeps the notifier, greeter and DM round testable without a
//!   gateway connection
//! - Resolving a recipient and sending to them fail separately, so callers
//!   can report which half went wrong
//! - One send at a time: the live implementation serializes outbound
//!   messages behind a mutex to stay clear of rate limits

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur while delivering a message.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The recipient could not be resolved to a user.
    #[error("User {0} could not be resolved: {1}")]
    Resolve(serenity::UserId, String),

    /// The direct message could not be delivered (closed DMs, blocks, rate
    /// limits and other gateway-side refusals end up here).
    #[error("DM to user {0} failed: {1}")]
    Send(serenity::UserId, String),

    /// A channel message could not be posted.
    #[error("Message to channel {0} failed: {1}")]
    Channel(serenity::ChannelId, String),
}

/// Result type for delivery operations.
pub type DeliveryResult = Result<(), DeliveryError>;

/// Outbound message delivery.
///
/// Everything the bot sends goes through this trait; tests substitute a
/// recording implementation.
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Send a direct message to a user.
    async fn direct_message(&self, user: serenity::UserId, content: &str) -> DeliveryResult;

    /// Post a message to a channel.
    async fn channel_message(&self, channel: serenity::ChannelId, content: &str)
        -> DeliveryResult;
}

/// Live [`ChatPort`] backed by the gateway HTTP client.
pub struct SerenityChat {
    http: Arc<serenity::Http>,
    /// Serializes outbound sends. Held only around the send itself, never
    /// around recipient resolution.
    send_lock: Mutex<()>,
}

impl SerenityChat {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self {
            http,
            send_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ChatPort for SerenityChat {
    async fn direct_message(&self, user: serenity::UserId, content: &str) -> DeliveryResult {
        let recipient = self
            .http
            .get_user(user)
            .await
            .map_err(|e| DeliveryError::Resolve(user, e.to_string()))?;

        let _guard = self.send_lock.lock().await;
        recipient
            .direct_message(&self.http, serenity::CreateMessage::new().content(content))
            .await
            .map_err(|e| DeliveryError::Send(user, e.to_string()))?;

        Ok(())
    }

    async fn channel_message(
        &self,
        channel: serenity::ChannelId,
        content: &str,
    ) -> DeliveryResult {
        let _guard = self.send_lock.lock().await;
        channel
            .say(&self.http, content)
            .await
            .map_err(|e| DeliveryError::Channel(channel, e.to_string()))?;

        Ok(())
    }
}
