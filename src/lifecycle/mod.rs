//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Spawn HTTP + pinger → Run gateway client
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or restart command → broadcast signal → tasks drain → Exit
//!
//! Restart:
//!     Restart command → restart flag set → exit with RESTART_EXIT_CODE →
//!     supervisor relaunches the process
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the stop signal out to every task
//! - Restart is an exit status, not an in-place exec; the supervisor owns
//!   process replacement

pub mod shutdown;

pub use shutdown::{Shutdown, RESTART_EXIT_CODE};
