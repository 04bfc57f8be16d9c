//! User-facing progress and warning hooks.
//!
//! The flows talk to the user (verification URL, user code, refresh
//! notices) through this trait rather than printing directly, so a host
//! client can route messages into its own output machinery.

/// Host logging hook for user-visible messages.
pub trait Reporter: Send + Sync {
    /// Progress message (verification URL/code, authorization success).
    fn inform(&self, message: &str);
    /// Recoverable anomaly (invalid cache, conflicting auth, refresh failure).
    fn warn(&self, message: &str);
}

/// Routes messages into `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn inform(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Prints messages to stdout/stderr; used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn inform(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("WARNING: {message}");
    }
}
