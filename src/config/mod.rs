//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: PORT, CONCIERGE_PUBLIC_URL)
//!     → validation.rs (semantic checks)
//!     → BotConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! DISCORD_TOKEN is read separately and never stored in BotConfig.
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs (or none at all)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config, load_config, read_token, redact_token, ConfigError};
pub use schema::BotConfig;
pub use schema::KeepAliveConfig;
pub use schema::RosterConfig;
pub use schema::WelcomeConfig;
