//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields, stdout)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, platform log drain)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Log subscriber is installed in main before anything else runs
//! - Metrics are cheap (atomic increments) and safe to record everywhere
//! - Exporter runs on its own listener, separate from the health server

pub mod metrics;
