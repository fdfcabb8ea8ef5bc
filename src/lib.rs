//! Concierge Bot Library

pub mod config;
pub mod discord;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod tasks;

pub use config::BotConfig;
pub use http::HealthServer;
pub use lifecycle::Shutdown;
