//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → health_handler (status, uptime, guild count, time)
//!
//! anything else
//!     → 404, logged by the access-log middleware
//! ```
//!
//! # Design Decisions
//! - One tiny server; the bot's real surface is the gateway, not HTTP
//! - Health responses are JSON so platform probes and humans both cope

pub mod server;

pub use server::{AppState, HealthServer, HealthStatus};
