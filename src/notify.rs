//! User-facing notification seam.
//!
//! The rendering layer (toasts in the original client) is an external
//! collaborator; the store only needs somewhere to send success/error text.

use tracing::{info, warn};

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// A completed action worth telling the user about.
    fn success(&self, message: &str);
    /// A failed action, with the text from
    /// [`TransportError::user_message`](crate::error::TransportError::user_message).
    fn error(&self, message: &str);
}

/// Default notifier that routes notifications to tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!(target: "chat_session::notify", "{message}");
    }

    fn error(&self, message: &str) {
        warn!(target: "chat_session::notify", "{message}");
    }
}
