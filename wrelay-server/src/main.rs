//! Wallet Relay Bot Server
//!
//! Bridges a wallet web app to Telegram: transaction alerts, account
//! linking, deposit matching against a payment inbox, and admin approval.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, Secrets};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wrelay_core::backend::BackendClient;
use wrelay_core::config::SharedConfig;
use wrelay_core::events::channels::notification_channel;
use wrelay_core::mailbox::MailboxClient;
use wrelay_core::processors::{InboxWatcher, Notifier, RoundAdvancer, UpdatePoller};
use wrelay_core::sessions::{ConnectCodeStore, DepositSessionStore};
use wrelay_core::telegram::TelegramClient;

/// Wallet relay bot - Telegram notification bridge for a wallet web app
#[derive(Parser, Debug)]
#[command(name = "wrelay-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./wrelay-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:8080)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting wrelay-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Secrets come from the environment, never from the config file
    let secrets = Secrets::from_env().map_err(|e| {
        tracing::error!("Missing secret: {}", e);
        e
    })?;

    let shared_config = SharedConfig::new(loaded_config.bot);

    // Clients and session stores
    let telegram = Arc::new(TelegramClient::new(&secrets.bot_token));
    let backend = Arc::new(BackendClient::new(
        &loaded_config.backend_url,
        secrets.backend_service_key,
    ));
    let mailbox = MailboxClient::new(
        loaded_config.mailbox.host,
        loaded_config.mailbox.user,
        secrets.mailbox_password,
        loaded_config.mailbox.sender_filter,
    );
    let connect_codes = Arc::new(ConnectCodeStore::new());
    let deposit_sessions = Arc::new(DepositSessionStore::new());

    // Event channel feeding the Notifier
    let (notify_tx, notify_rx) = notification_channel();

    // Shutdown signal shared by all processors
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut handles = Vec::new();

    let notifier = Notifier::new(
        telegram.clone(),
        shared_config.clone(),
        notify_rx,
        shutdown_rx.clone(),
    );
    handles.push(tokio::spawn(notifier.run()));

    let update_poller = UpdatePoller::new(
        telegram.clone(),
        backend.clone(),
        connect_codes.clone(),
        deposit_sessions.clone(),
        shared_config.clone(),
        shutdown_rx.clone(),
    );
    handles.push(tokio::spawn(update_poller.run()));

    let inbox_watcher = InboxWatcher::new(
        mailbox,
        connect_codes.clone(),
        deposit_sessions.clone(),
        notify_tx.clone(),
        shutdown_rx.clone(),
    );
    handles.push(tokio::spawn(inbox_watcher.run()));

    if let Some(game) = loaded_config.game {
        let round_advancer = RoundAdvancer::new(backend.clone(), game, shutdown_rx.clone());
        handles.push(tokio::spawn(round_advancer.run()));
    } else {
        tracing::info!("No [game] section configured, round advancer disabled");
    }

    // Create application state
    let app_state = AppState {
        telegram,
        config: shared_config,
        connect_codes,
        deposit_sessions,
        notify_tx,
    };

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(app_state.clone(), config_loader);

    // Build the router
    let router = build_router(app_state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Stop the processors and the config reload handler
    tracing::info!("Stopping background processors...");
    let _ = shutdown_tx.send(true);
    shutdown_notify.notify_one();
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!("Processor task panicked: {}", e);
        }
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
