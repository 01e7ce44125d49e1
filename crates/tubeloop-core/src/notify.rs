//! User-visible notification sink.
//!
//! Fire-and-forget message display (a toast in the original UI). Only the
//! playback controller is allowed to call it; the store and navigator
//! report error conditions upward instead of displaying anything.

use tracing::info;

/// Destination for user-visible, fire-and-forget messages.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink {
    /// Show a message to the user.
    fn notify(&self, message: &str);
}

/// Sink that writes notifications to the log instead of a UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, message: &str) {
        info!(target: "tubeloop::notice", "{message}");
    }
}
