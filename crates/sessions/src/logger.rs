//! Diagnostics sink for the session manager.

/// Receives human-readable diagnostics.  Never used for control flow.
pub trait SessionLogger: Send + Sync {
    fn log(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default logger: forwards to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl SessionLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
