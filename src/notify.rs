//! Fire-and-forget notification sink
//!
//! The engine reports every operation's outcome here once it is known -
//! success, degraded-mode warnings, denials. Implementations must never
//! block; the default forwards to the tracing pipeline.

use tracing::{error, info, warn};

/// User-facing outcome notifications (toasts in the original UI)
pub trait Notifier: Send + Sync {
    fn success(&self, title: &str, detail: &str);
    fn warning(&self, title: &str, detail: &str);
    fn error(&self, title: &str, detail: &str);
}

/// Default sink: structured log events
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, title: &str, detail: &str) {
        info!(title = title, "{}", detail);
    }

    fn warning(&self, title: &str, detail: &str) {
        warn!(title = title, "{}", detail);
    }

    fn error(&self, title: &str, detail: &str) {
        error!(title = title, "{}", detail);
    }
}
