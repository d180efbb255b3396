//! Bot configuration.

use url::Url;

/// Telegram-facing configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The bot's public username (without `@`), used to build connect links.
    pub username: String,
    /// Chat id receiving admin alerts.
    pub admin_chat_id: String,
    /// Group chat id receiving deposit approval requests.
    pub admin_group_id: String,
    /// The wallet mini-app URL attached to user messages.
    pub miniapp_url: Url,
}

impl BotConfig {
    /// Mini-app URL without a trailing slash, ready for path concatenation.
    pub fn miniapp_url_str(&self) -> &str {
        self.miniapp_url.as_str().trim_end_matches('/')
    }
}
