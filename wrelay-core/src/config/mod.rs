//! Runtime configuration types for the wallet relay.
//!
//! These are the validated runtime values shared across crates; loading
//! and parsing from the TOML file is handled by the server crate.

mod bot;
mod game;
mod mailbox;
mod server;

pub use bot::BotConfig;
pub use game::GameConfig;
pub use mailbox::MailboxSettings;
pub use server::ServerConfig;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Configuration shared with request handlers and processors.
///
/// Only the bot section is consulted after startup (admin chat ids,
/// mini-app URL, bot username for connect links), so it alone sits behind
/// a lock and can be reloaded via SIGHUP. Listen address, mailbox and
/// backend settings are fixed at process start.
#[derive(Clone)]
pub struct SharedConfig {
    pub bot: Arc<RwLock<BotConfig>>,
}

impl SharedConfig {
    pub fn new(bot: BotConfig) -> Self {
        Self {
            bot: Arc::new(RwLock::new(bot)),
        }
    }
}
