//! TOML file configuration structures.
//!
//! These structs directly map to the `wrelay-config.toml` file format.

use serde::Deserialize;
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub server: ServerSection,
    pub bot: BotSection,
    pub mailbox: MailboxSection,
    pub backend: BackendSection,
    /// Optional; when absent, no game rounds are advanced.
    pub game: Option<GameSection>,
}

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Bot configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct BotSection {
    /// The bot's public username, without `@`.
    pub username: String,
    /// Chat id receiving admin alerts.
    pub admin_chat_id: String,
    /// Group chat id receiving deposit approval requests.
    pub admin_group_id: String,
    /// The wallet mini-app URL.
    pub miniapp_url: Url,
}

/// Mailbox configuration section. The IMAP password comes from the
/// environment, not from this file.
#[derive(Debug, Clone, Deserialize)]
pub struct MailboxSection {
    pub host: String,
    pub user: String,
    /// Only emails from this sender count as payment confirmations.
    pub sender: String,
}

/// Backend configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
    /// Base URL of the REST backend.
    pub url: Url,
}

/// Game round configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct GameSection {
    #[serde(default = "default_betting_secs")]
    pub betting_secs: u64,
    #[serde(default = "default_pause_secs")]
    pub pause_secs: u64,
}

fn default_betting_secs() -> u64 {
    10
}

fn default_pause_secs() -> u64 {
    3
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[bot]
username = "MyWalletBot"
admin_chat_id = "123456789"
admin_group_id = "-1002437040000"
miniapp_url = "https://wallet.example.com/"

[mailbox]
host = "imap.gmail.com"
user = "payments@example.com"
sender = "alerts@bank.example.com"

[backend]
url = "https://project.supabase.co"

[game]
betting_secs = 15
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.bot.username, "MyWalletBot");
        assert_eq!(config.mailbox.host, "imap.gmail.com");
        let game = config.game.unwrap();
        assert_eq!(game.betting_secs, 15);
        assert_eq!(game.pause_secs, 3);
    }

    #[test]
    fn game_section_is_optional() {
        let toml_str = r#"
[server]

[bot]
username = "MyWalletBot"
admin_chat_id = "1"
admin_group_id = "-1"
miniapp_url = "https://wallet.example.com"

[mailbox]
host = "imap.gmail.com"
user = "payments@example.com"
sender = "alerts@bank.example.com"

[backend]
url = "https://project.supabase.co"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.game.is_none());
        assert_eq!(config.server.listen.port(), 8080);
    }
}
