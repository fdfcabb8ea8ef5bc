//! Chat platform subsystem.
//!
//! # Data Flow
//! ```text
//! gateway events
//!     → gateway.rs (ready, joins, guild count)
//!     → greeter.rs (welcome posts)
//!     → tasks::dm_round (started once on ready)
//!
//! outbound messages
//!     → port.rs (ChatPort: one seam for every send)
//!     → notifier.rs (admin fan-out)
//!
//! commands (!restart, /restart)
//!     → commands.rs (admin gated)
//!     → lifecycle::Shutdown (restart exit)
//! ```
//!
//! # Design Decisions
//! - All senders go through `ChatPort` so delivery logic is testable
//!   without a live gateway
//! - Command and event errors use the boxed error alias the command
//!   framework expects; domain errors stay typed underneath it

pub mod commands;
pub mod gateway;
pub mod greeter;
pub mod notifier;
pub mod port;

pub use gateway::Data;
pub use greeter::{Greeter, JoinOutcome, WelcomeGate};
pub use notifier::AdminNotifier;
pub use port::{ChatPort, DeliveryError, SerenityChat};

/// Error alias used by command and event handlers.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context alias.
pub type Context<'a> = poise::Context<'a, Data, Error>;
