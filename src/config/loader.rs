//! Configuration loading from disk and the environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::BotConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the gateway token.
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    MissingToken,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::MissingToken => {
                write!(f, "environment variable {} is not set", TOKEN_ENV)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides (`PORT`, `CONCIERGE_PUBLIC_URL`) are applied after
/// parsing and before validation.
pub fn load_config(path: &Path) -> Result<BotConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config = parse_config(&content)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a default configuration, still subject to environment overrides
/// and validation. Used when no config file is present.
pub fn default_config() -> Result<BotConfig, ConfigError> {
    let mut config = BotConfig::default();

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a configuration document without touching the filesystem.
pub fn parse_config(content: &str) -> Result<BotConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Read the gateway token from the environment.
///
/// An unset or empty variable is an error; the caller decides how fatal
/// that is (at startup: very).
pub fn read_token() -> Result<String, ConfigError> {
    match env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => Ok(token),
        _ => Err(ConfigError::MissingToken),
    }
}

/// Redact a token down to a short prefix suitable for log output.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(5).collect();
    format!("{}****", prefix)
}

fn apply_env_overrides(config: &mut BotConfig) {
    if let Ok(port) = env::var("PORT") {
        match port.parse() {
            Ok(port) => config.http.port = port,
            Err(_) => {
                tracing::warn!(value = %port, "Ignoring unparseable PORT override");
            }
        }
    }

    if let Ok(url) = env::var("CONCIERGE_PUBLIC_URL") {
        if !url.trim().is_empty() {
            config.keep_alive.base_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let content = r#"
            [discord]
            command_prefix = "?"

            [welcome]
            channel_id = 1122334455
            role_id = 5544332211
            cooldown_secs = 50
            message = "Hello {role}!"

            [roster]
            admins = [111, 222]
            dm_targets = [333]
            dm_message = "checking in"
            dm_interval_secs = 3600

            [http]
            port = 9000

            [keep_alive]
            enabled = true
            base_url = "https://bot.example.net"
            interval_secs = 300

            [observability]
            metrics_enabled = false
            metrics_address = "127.0.0.1:9100"
        "#;

        let config = parse_config(content).unwrap();
        assert_eq!(config.discord.command_prefix, "?");
        assert_eq!(config.welcome.channel_id, 1122334455);
        assert_eq!(config.roster.admins, vec![111, 222]);
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.keep_alive.base_url, "https://bot.example.net");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = parse_config("[roster]\nadmins = [42]\n").unwrap();
        assert_eq!(config.roster.admins, vec![42]);
        assert_eq!(config.discord.command_prefix, "!");
        assert_eq!(config.welcome.cooldown_secs, 50);
        assert_eq!(config.roster.dm_interval_secs, 3600);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.keep_alive.interval_secs, 300);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_config("welcome = \"not a table\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn token_redaction_keeps_five_chars() {
        assert_eq!(redact_token("MTAxMjM0NTY3ODkw"), "MTAxM****");
        assert_eq!(redact_token("abc"), "abc****");
        assert_eq!(redact_token(""), "****");
    }

    // Single test so the env mutations stay sequential.
    #[test]
    fn missing_or_blank_token_is_an_error() {
        std::env::remove_var(TOKEN_ENV);
        assert!(matches!(read_token(), Err(ConfigError::MissingToken)));

        std::env::set_var(TOKEN_ENV, "   ");
        assert!(matches!(read_token(), Err(ConfigError::MissingToken)));

        std::env::set_var(TOKEN_ENV, "MTAx.valid.token");
        assert_eq!(read_token().unwrap(), "MTAx.valid.token");
        std::env::remove_var(TOKEN_ENV);
    }
}
