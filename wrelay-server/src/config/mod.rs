//! Configuration module for wrelay-server.
//!
//! Handles loading configuration from the TOML file, CLI arguments,
//! and environment variables (secrets).

pub mod file;

use crate::config::file::FileConfig;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use wrelay_core::config::{BotConfig, GameConfig, MailboxSettings, ServerConfig};

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub bot: BotConfig,
    pub mailbox: MailboxSettings,
    pub backend_url: url::Url,
    pub game: Option<GameConfig>,
}

/// Secrets read from the environment at startup.
pub struct Secrets {
    /// Telegram Bot API token.
    pub bot_token: String,
    /// IMAP account password.
    pub mailbox_password: String,
    /// Service key sent to the REST backend.
    pub backend_service_key: String,
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bot_token: require_env("BOT_TOKEN")?,
            mailbox_password: require_env("MAILBOX_PASSWORD")?,
            backend_service_key: require_env("BACKEND_SERVICE_KEY")?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// Reads the TOML file, applies CLI overrides, then validates.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        self.validate(&file_config)?;

        Ok(build_loaded_config(file_config))
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.bot.username.is_empty() || config.bot.username.starts_with('@') {
            return Err(ConfigError::ValidationError(
                "bot.username must be non-empty and given without the leading @".to_string(),
            ));
        }
        if config.bot.admin_chat_id.is_empty() || config.bot.admin_group_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "bot.admin_chat_id and bot.admin_group_id must be set".to_string(),
            ));
        }
        if config.mailbox.sender.is_empty() {
            return Err(ConfigError::ValidationError(
                "mailbox.sender must be set".to_string(),
            ));
        }
        Ok(())
    }
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
        },
        bot: BotConfig {
            username: file_config.bot.username,
            admin_chat_id: file_config.bot.admin_chat_id,
            admin_group_id: file_config.bot.admin_group_id,
            miniapp_url: file_config.bot.miniapp_url,
        },
        mailbox: MailboxSettings {
            host: file_config.mailbox.host,
            user: file_config.mailbox.user,
            sender_filter: file_config.mailbox.sender,
        },
        backend_url: file_config.backend.url,
        game: file_config.game.map(|g| GameConfig {
            betting_secs: g.betting_secs,
            pause_secs: g.pause_secs,
        }),
    }
}
