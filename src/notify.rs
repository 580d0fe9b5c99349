//! User notifications
//!
//! Presentation is someone else's job; the workflow only says what to show.

use tracing::{error, info};

/// Where user-facing messages go
pub trait NotificationSink {
    fn error(&mut self, message: &str);

    /// `auto_dismiss` closes the message after a delay
    fn success(&mut self, message: &str, auto_dismiss: bool);
}

/// Sink that forwards notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn error(&mut self, message: &str) {
        error!(target: "notification", "{}", message);
    }

    fn success(&mut self, message: &str, auto_dismiss: bool) {
        info!(target: "notification", auto_dismiss, "{}", message);
    }
}
