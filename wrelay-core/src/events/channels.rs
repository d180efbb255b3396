//! Event channel factory and handles.

use super::types::NotificationEvent;
use tokio::sync::mpsc;

/// Default buffer size for event channels.
///
/// Enough to absorb a burst of transaction notifications while keeping
/// memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for NotificationEvent events.
pub type NotificationSender = mpsc::Sender<NotificationEvent>;
/// Receiver handle for NotificationEvent events.
pub type NotificationReceiver = mpsc::Receiver<NotificationEvent>;

/// Create a new NotificationEvent channel.
///
/// Returns a (sender, receiver) pair. Multiple senders can be cloned from
/// the returned sender; the Notifier owns the single receiver.
pub fn notification_channel() -> (NotificationSender, NotificationReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
