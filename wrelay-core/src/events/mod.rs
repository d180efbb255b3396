//! Event channel infrastructure.
//!
//! HTTP handlers and background loops hand outbound Telegram work to the
//! Notifier through a single typed mpsc channel. Events are ephemeral:
//! nothing is persisted, and a failed delivery is logged and dropped.

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, NotificationReceiver, NotificationSender, notification_channel,
};
pub use types::{NotificationEvent, TransactionNotice};
