//! Application state shared across all request handlers.

use std::sync::Arc;
use wrelay_core::config::SharedConfig;
use wrelay_core::events::channels::NotificationSender;
use wrelay_core::sessions::{ConnectCodeStore, DepositSessionStore};
use wrelay_core::telegram::TelegramClient;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Telegram Bot API client, for synchronous checks like membership.
    pub telegram: Arc<TelegramClient>,
    /// Runtime configuration (the bot section can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// One-time connect codes bridging the web app to Telegram.
    pub connect_codes: Arc<ConnectCodeStore>,
    /// Live deposit-matching sessions.
    pub deposit_sessions: Arc<DepositSessionStore>,
    /// Queue feeding the Notifier processor.
    pub notify_tx: NotificationSender,
}
