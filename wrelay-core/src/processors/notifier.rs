//! Notifier processor.
//!
//! The Notifier is responsible for:
//! - Receiving `NotificationEvent` from the queue
//! - Building message text and keyboards
//! - Performing the actual Telegram sends
//!
//! Delivery is best-effort: a failed send is logged and dropped; the next
//! event is processed regardless. There is no retry.

use crate::config::SharedConfig;
use crate::events::{NotificationEvent, NotificationReceiver, TransactionNotice};
use crate::sessions::DepositSession;
use crate::telegram::{TelegramClient, TelegramError, format};
use crate::utils::bonus::deposit_bonus;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Notifier handles outbound Telegram notifications.
pub struct Notifier {
    telegram: Arc<TelegramClient>,
    config: SharedConfig,
    event_rx: NotificationReceiver,
    shutdown_rx: watch::Receiver<bool>,
}

impl Notifier {
    pub fn new(
        telegram: Arc<TelegramClient>,
        config: SharedConfig,
        event_rx: NotificationReceiver,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            telegram,
            config,
            event_rx,
            shutdown_rx,
        }
    }

    /// Run the Notifier.
    pub async fn run(mut self) {
        info!("Notifier started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("Notifier received shutdown signal");
                        break;
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    debug!(event = ?event, "Received NotificationEvent");

                    if let Err(e) = self.process_event(event).await {
                        error!(error = %e, "Failed to deliver notification");
                    }
                }

                else => {
                    info!("NotificationEvent channel closed");
                    break;
                }
            }
        }

        info!("Notifier shutdown complete");
    }

    async fn process_event(&self, event: NotificationEvent) -> Result<(), TelegramError> {
        match event {
            NotificationEvent::Transaction(notice) => self.send_transaction_alert(&notice).await,
            NotificationEvent::Admin { message } => self.send_admin_alert(&message).await,
            NotificationEvent::ApprovalRequest {
                request_id,
                session,
                amount,
                sender_name,
            } => {
                self.send_approval_request(&request_id, &session, amount, sender_name.as_deref())
                    .await
            }
        }
    }

    async fn send_transaction_alert(&self, notice: &TransactionNotice) -> Result<(), TelegramError> {
        let text = format::transaction_alert(notice);
        let keyboard = {
            let bot = self.config.bot.read().await;
            format::open_wallet_keyboard(bot.miniapp_url_str())
        };
        self.telegram
            .send_message(&notice.chat_id, &text, Some(&keyboard))
            .await?;
        Ok(())
    }

    async fn send_admin_alert(&self, message: &str) -> Result<(), TelegramError> {
        let (admin_chat_id, keyboard) = {
            let bot = self.config.bot.read().await;
            (
                bot.admin_chat_id.clone(),
                format::admin_panel_keyboard(bot.miniapp_url_str()),
            )
        };
        self.telegram
            .send_message(&admin_chat_id, message, Some(&keyboard))
            .await?;
        Ok(())
    }

    async fn send_approval_request(
        &self,
        request_id: &str,
        session: &DepositSession,
        amount: Decimal,
        sender_name: Option<&str>,
    ) -> Result<(), TelegramError> {
        let admin_group_id = self.config.bot.read().await.admin_group_id.clone();
        let text = format::approval_request(session, amount, deposit_bonus(amount), sender_name);
        let keyboard = format::approval_keyboard(request_id);
        self.telegram
            .send_message(&admin_group_id, &text, Some(&keyboard))
            .await?;
        info!(request_id = %request_id, amount = %amount, "Approval request sent to admin group");
        Ok(())
    }
}
