//! Shutdown coordination for the bot.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

/// Process exit code that asks the supervisor to relaunch the bot.
///
/// The restart command does not re-exec the process in place; it drains the
/// gateway connection and background tasks, then exits with this status so
/// that the supervisor (systemd unit, container runtime, hosting platform)
/// starts a fresh process.
pub const RESTART_EXIT_CODE: i32 = 75;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks subscribe to,
/// plus a flag distinguishing a plain stop from a requested restart.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
    /// Set when shutdown was triggered by the restart command.
    restart_requested: AtomicBool,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            restart_requested: AtomicBool::new(false),
        }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger shutdown and mark that the process should be relaunched.
    pub fn trigger_restart(&self) {
        self.restart_requested.store(true, Ordering::SeqCst);
        self.trigger();
    }

    /// Whether the shutdown in progress should end in [`RESTART_EXIT_CODE`].
    pub fn restart_requested(&self) -> bool {
        self.restart_requested.load(Ordering::SeqCst)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
