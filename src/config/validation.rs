//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, IDs non-zero)
//! - Check the keep-alive URL actually parses before the pinger runs
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: BotConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Unset welcome IDs (zero) are allowed; the greeter logs a warning per
//!   join instead of the process refusing to start

use url::Url;

use crate::config::schema::BotConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// An interval or cooldown that must be positive is zero.
    #[error("`{0}` must be greater than zero")]
    ZeroDuration(&'static str),

    /// A user ID list contains zero, which is not a valid snowflake.
    #[error("`{0}` contains the ID 0, which is not a valid user ID")]
    ZeroId(&'static str),

    /// A message body is empty while the feature that sends it is active.
    #[error("`{0}` must not be empty")]
    EmptyMessage(&'static str),

    /// The keep-alive base URL does not parse as an absolute http(s) URL.
    #[error("`keep_alive.base_url` is not a valid http(s) URL: {0}")]
    InvalidBaseUrl(String),

    /// The metrics bind address does not parse as a socket address.
    #[error("`observability.metrics_address` is not a valid socket address: {0}")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.welcome.cooldown_secs == 0 {
        errors.push(ValidationError::ZeroDuration("welcome.cooldown_secs"));
    }
    if config.roster.dm_interval_secs == 0 {
        errors.push(ValidationError::ZeroDuration("roster.dm_interval_secs"));
    }

    if config.roster.admins.contains(&0) {
        errors.push(ValidationError::ZeroId("roster.admins"));
    }
    if config.roster.dm_targets.contains(&0) {
        errors.push(ValidationError::ZeroId("roster.dm_targets"));
    }

    if !config.roster.dm_targets.is_empty() && config.roster.dm_message.trim().is_empty() {
        errors.push(ValidationError::EmptyMessage("roster.dm_message"));
    }
    if config.welcome.channel_id != 0 && config.welcome.message.trim().is_empty() {
        errors.push(ValidationError::EmptyMessage("welcome.message"));
    }

    if config.keep_alive.enabled {
        if config.keep_alive.interval_secs == 0 {
            errors.push(ValidationError::ZeroDuration("keep_alive.interval_secs"));
        }
        match Url::parse(&config.keep_alive.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                errors.push(ValidationError::InvalidBaseUrl(format!(
                    "unsupported scheme `{}`",
                    url.scheme()
                )));
            }
            Err(e) => {
                errors.push(ValidationError::InvalidBaseUrl(e.to_string()));
            }
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
