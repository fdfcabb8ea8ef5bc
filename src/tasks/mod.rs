//! Background tasks.
//!
//! # Data Flow
//! ```text
//! dm_round.rs:
//!     gateway ready → start (once) → tick → DM each target →
//!     failures reported inline → success notice when clean
//!
//! keep_alive.rs:
//!     startup → tick → GET {base_url}/health → log status
//! ```
//!
//! # Design Decisions
//! - Every task owns a shutdown receiver and exits its loop on signal
//! - Tasks never share locks with each other

pub mod dm_round;
pub mod keep_alive;

pub use dm_round::DmRound;
pub use keep_alive::KeepAlivePinger;
