//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bot.
//! All types derive Serde traits for deserialization from config files.
//!
//! The gateway token is deliberately absent: it is secret material and is
//! only ever read from the `DISCORD_TOKEN` environment variable.

use serde::{Deserialize, Serialize};

/// Root configuration for the concierge bot.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BotConfig {
    /// Chat platform client settings.
    pub discord: DiscordConfig,

    /// Welcome-on-join settings.
    pub welcome: WelcomeConfig,

    /// Administrator and DM recipient lists.
    pub roster: RosterConfig,

    /// Health endpoint settings.
    pub http: HttpConfig,

    /// Keep-alive self-ping settings.
    pub keep_alive: KeepAliveConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chat platform client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Prefix for text commands (e.g., "!" for `!restart`).
    pub command_prefix: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            command_prefix: "!".to_string(),
        }
    }
}

/// Welcome-on-join configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WelcomeConfig {
    /// Channel the welcome message is posted to. 0 leaves welcomes disabled
    /// (every join logs a missing-channel warning instead).
    pub channel_id: u64,

    /// Role mentioned in the welcome message. 0 leaves welcomes disabled.
    pub role_id: u64,

    /// Suppression window after a welcome is posted, in seconds. Joins
    /// inside the window are dropped without posting.
    pub cooldown_secs: u64,

    /// Message template. `{role}` is replaced with a role mention.
    pub message: String,
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            channel_id: 0,
            role_id: 0,
            cooldown_secs: 50,
            message: "Welcome {role}! Please read the rules first, then introduce yourself."
                .to_string(),
        }
    }
}

/// Administrator and DM recipient configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Users who receive operational notices via DM.
    pub admins: Vec<u64>,

    /// Users who receive the periodic DM.
    pub dm_targets: Vec<u64>,

    /// Body of the periodic DM.
    pub dm_message: String,

    /// Interval between periodic DM rounds in seconds.
    pub dm_interval_secs: u64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            dm_targets: Vec::new(),
            dm_message: "Scheduled check-in from the concierge bot.".to_string(),
            dm_interval_secs: 3600,
        }
    }
}

/// Health endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Listen port. The server binds 0.0.0.0 so hosting platforms can route
    /// to it. Overridden by the `PORT` environment variable.
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Keep-alive self-ping configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeepAliveConfig {
    /// Enable the self-ping loop.
    pub enabled: bool,

    /// Public base URL of this deployment. The pinger requests
    /// `{base_url}/health`. Overridden by `CONCIERGE_PUBLIC_URL`.
    pub base_url: String,

    /// Interval between self-pings in seconds.
    pub interval_secs: u64,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // Placeholder; point this at the deployment's public URL.
            base_url: "https://concierge.onrender.com".to_string(),
            interval_secs: 300,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
