//! UpdatePoller processor.
//!
//! The UpdatePoller is responsible for:
//! - Long-polling `getUpdates` and tracking the last seen update id
//! - Dispatching bot commands (`/start`, `/help`, `/id`, `/chatid`)
//! - Handling approve/decline callbacks from the admin group, which drive
//!   the deposit crediting flow against the backend
//!
//! Per the uniform error policy, every external call is logged on failure
//! and the loop moves on; the next polling cycle tries again.

use crate::backend::types::{FundRequestStatus, NewTransaction};
use crate::backend::BackendClient;
use crate::config::SharedConfig;
use crate::sessions::{ConnectCodeStore, DepositSession, DepositSessionStore};
use crate::telegram::types::{CallbackQuery, Message, Update};
use crate::telegram::{TelegramClient, format};
use crate::utils::bonus::deposit_bonus;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Server-side long-poll window for `getUpdates`.
const POLL_TIMEOUT_SECS: u64 = 25;

/// Pause after a failed poll before trying again.
const POLL_RETRY_PAUSE: std::time::Duration = std::time::Duration::from_secs(3);

/// UpdatePoller reads and dispatches incoming bot updates.
pub struct UpdatePoller {
    telegram: Arc<TelegramClient>,
    backend: Arc<BackendClient>,
    connect_codes: Arc<ConnectCodeStore>,
    deposit_sessions: Arc<DepositSessionStore>,
    config: SharedConfig,
    shutdown_rx: watch::Receiver<bool>,
}

impl UpdatePoller {
    pub fn new(
        telegram: Arc<TelegramClient>,
        backend: Arc<BackendClient>,
        connect_codes: Arc<ConnectCodeStore>,
        deposit_sessions: Arc<DepositSessionStore>,
        config: SharedConfig,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            telegram,
            backend,
            connect_codes,
            deposit_sessions,
            config,
            shutdown_rx,
        }
    }

    /// Run the UpdatePoller.
    pub async fn run(mut self) {
        info!("UpdatePoller started");

        // Polling and webhook mode are mutually exclusive upstream.
        if let Err(e) = self.telegram.delete_webhook(true).await {
            warn!(error = %e, "Failed to delete webhook before polling");
        }

        let mut offset: Option<i64> = None;

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("UpdatePoller received shutdown signal");
                        break;
                    }
                }

                batch = self.telegram.get_updates(offset, POLL_TIMEOUT_SECS) => {
                    match batch {
                        Ok(updates) => {
                            for update in updates {
                                offset = Some(update.update_id + 1);
                                self.handle_update(update).await;
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "getUpdates failed");
                            if !super::sleep_or_shutdown(&mut self.shutdown_rx, POLL_RETRY_PAUSE).await {
                                break;
                            }
                        }
                    }
                }
            }
        }

        info!("UpdatePoller shutdown complete");
    }

    async fn handle_update(&self, update: Update) {
        if let Some(callback) = update.callback_query {
            self.handle_callback(callback).await;
            return;
        }
        let Some(message) = update.message else { return };
        let Some(text) = message.text.clone() else { return };

        let mut parts = text.split_whitespace();
        let Some(first) = parts.next() else { return };
        // Commands in groups arrive as `/cmd@BotName`.
        let command = first.split('@').next().unwrap_or(first);

        match command {
            "/start" => self.cmd_start(&message, parts.next()).await,
            "/help" => self.cmd_help(&message).await,
            "/id" => self.cmd_id(&message).await,
            "/chatid" => self.cmd_chatid(&message).await,
            _ => {}
        }
    }

    // -- Commands -----------------------------------------------------------

    async fn cmd_start(&self, message: &Message, code: Option<&str>) {
        let Some(user) = message.from.as_ref() else { return };

        if let Some(code) = code {
            match self.connect_codes.take(code, OffsetDateTime::now_utc()) {
                Some(pending) => {
                    match self.backend.link_telegram_id(&pending.user_id, user.id).await {
                        Ok(()) => {
                            info!(
                                user_id = %pending.user_id,
                                telegram_id = user.id,
                                "Wallet account connected"
                            );
                            let text = format::connect_success(&pending.display_name, user.id);
                            self.reply_with_wallet_button(message, &text).await;
                        }
                        Err(e) => {
                            error!(user_id = %pending.user_id, error = %e, "Failed to store telegram id");
                            self.reply(message, format::CONNECT_FAILED).await;
                        }
                    }
                }
                None => self.reply(message, format::CONNECT_CODE_SPENT).await,
            }
            return;
        }

        let text = format::welcome(&user.first_name);
        self.reply_with_wallet_button(message, &text).await;
    }

    async fn cmd_help(&self, message: &Message) {
        let text = {
            let bot = self.config.bot.read().await;
            format::help_text(&bot.username)
        };
        self.reply_with_wallet_button(message, &text).await;
    }

    async fn cmd_id(&self, message: &Message) {
        let Some(user) = message.from.as_ref() else { return };
        self.reply(message, &user.id.to_string()).await;
    }

    async fn cmd_chatid(&self, message: &Message) {
        match message.forward_from_chat.as_ref() {
            Some(chat) => {
                let title = chat.title.as_deref().unwrap_or("Channel");
                self.reply(message, &format::chatid_reply(title, chat.id)).await;
            }
            None => self.reply(message, format::CHATID_USAGE).await,
        }
    }

    // -- Approve / decline callbacks ----------------------------------------

    async fn handle_callback(&self, callback: CallbackQuery) {
        if let Err(e) = self.telegram.answer_callback_query(&callback.id).await {
            debug!(error = %e, "Failed to answer callback query");
        }
        let Some(data) = callback.data.clone() else { return };

        if let Some(request_id) = data.strip_prefix("approve_") {
            self.handle_approve(&callback, request_id).await;
        } else if let Some(request_id) = data.strip_prefix("decline_") {
            self.handle_decline(&callback, request_id).await;
        }
    }

    async fn handle_approve(&self, callback: &CallbackQuery, request_id: &str) {
        let Some(session) = self.deposit_sessions.get(request_id) else {
            self.edit_admin_message(callback, format::SESSION_GONE).await;
            return;
        };

        let amount = session.amount;
        let bonus = deposit_bonus(amount);
        let total = amount + bonus;

        let balance = match self.backend.fetch_balance(&session.user_id).await {
            Ok(Some(balance)) => balance,
            Ok(None) => {
                self.edit_admin_message(callback, "⚠️ User profile not found.").await;
                return;
            }
            Err(e) => {
                error!(request_id = %request_id, error = %e, "Approve failed reading balance");
                self.edit_admin_message(callback, &format!("⚠️ Error approving: {e}")).await;
                return;
            }
        };
        let new_balance = (balance + total).round_dp(2);

        if let Err(e) = self.backend.set_balance(&session.user_id, new_balance).await {
            error!(request_id = %request_id, error = %e, "Approve failed updating balance");
            self.edit_admin_message(callback, &format!("⚠️ Error approving: {e}")).await;
            return;
        }

        // Balance is already credited; the remaining writes are best-effort.
        if let Err(e) = self
            .backend
            .set_fund_request_status(request_id, FundRequestStatus::Approved)
            .await
        {
            error!(request_id = %request_id, error = %e, "Failed to mark fund request approved");
        }
        let ledger_entry = NewTransaction::approved_deposit(session.user_id.clone(), amount, bonus);
        if let Err(e) = self.backend.insert_transaction(&ledger_entry).await {
            error!(request_id = %request_id, error = %e, "Failed to insert ledger transaction");
        }

        self.notify_depositor(
            &session,
            &format::deposit_approved_user(amount, bonus, new_balance),
        )
        .await;

        self.edit_admin_message(
            callback,
            &format::approved_summary(&session.display_name, amount, bonus, new_balance),
        )
        .await;

        self.deposit_sessions.remove(request_id);
        info!(request_id = %request_id, total = %total, "Deposit approved and credited");
    }

    async fn handle_decline(&self, callback: &CallbackQuery, request_id: &str) {
        let Some(session) = self.deposit_sessions.get(request_id) else {
            self.edit_admin_message(callback, format::SESSION_GONE).await;
            return;
        };

        if let Err(e) = self
            .backend
            .set_fund_request_status(request_id, FundRequestStatus::Declined)
            .await
        {
            error!(request_id = %request_id, error = %e, "Failed to mark fund request declined");
        }

        self.notify_depositor(&session, &format::deposit_declined_user(session.amount))
            .await;

        self.edit_admin_message(
            callback,
            &format::declined_summary(&session.display_name, session.amount),
        )
        .await;

        self.deposit_sessions.remove(request_id);
        info!(request_id = %request_id, "Deposit declined");
    }

    // -- Send helpers -------------------------------------------------------

    async fn reply(&self, message: &Message, text: &str) {
        let chat_id = message.chat.id.to_string();
        if let Err(e) = self.telegram.send_message(&chat_id, text, None).await {
            error!(chat_id = %chat_id, error = %e, "Failed to send reply");
        }
    }

    async fn reply_with_wallet_button(&self, message: &Message, text: &str) {
        let keyboard = {
            let bot = self.config.bot.read().await;
            format::open_wallet_keyboard(bot.miniapp_url_str())
        };
        let chat_id = message.chat.id.to_string();
        if let Err(e) = self.telegram.send_message(&chat_id, text, Some(&keyboard)).await {
            error!(chat_id = %chat_id, error = %e, "Failed to send reply");
        }
    }

    /// Notify the depositing user, when their account is linked to Telegram.
    async fn notify_depositor(&self, session: &DepositSession, text: &str) {
        let Some(telegram_id) = session.telegram_id.as_deref() else {
            return;
        };
        let keyboard = {
            let bot = self.config.bot.read().await;
            format::open_wallet_keyboard(bot.miniapp_url_str())
        };
        if let Err(e) = self.telegram.send_message(telegram_id, text, Some(&keyboard)).await {
            error!(telegram_id = %telegram_id, error = %e, "Failed to notify depositor");
        }
    }

    /// Replace the approval request message in the admin group.
    async fn edit_admin_message(&self, callback: &CallbackQuery, text: &str) {
        let Some(message) = callback.message.as_ref() else { return };
        if let Err(e) = self
            .telegram
            .edit_message_text(message.chat.id, message.message_id, text)
            .await
        {
            error!(error = %e, "Failed to edit admin message");
        }
    }
}
