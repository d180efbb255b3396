//! InboxWatcher processor.
//!
//! Polls the payment mailbox on a fixed interval, parses bank alert emails
//! and matches them against live deposit sessions by amount. A successful
//! match raises an approval request event for the admin group.

use crate::events::channels::NotificationSender;
use crate::events::types::NotificationEvent;
use crate::mailbox::parse::parse_payment_email;
use crate::mailbox::MailboxClient;
use crate::sessions::{ConnectCodeStore, DepositSessionStore};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Pause between mailbox polls.
const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// How far back to look for unseen payment emails.
const EMAIL_WINDOW: time::Duration = time::Duration::minutes(6);

/// InboxWatcher matches incoming payment emails to deposit sessions.
pub struct InboxWatcher {
    mailbox: MailboxClient,
    connect_codes: Arc<ConnectCodeStore>,
    deposit_sessions: Arc<DepositSessionStore>,
    event_tx: NotificationSender,
    shutdown_rx: watch::Receiver<bool>,
}

impl InboxWatcher {
    pub fn new(
        mailbox: MailboxClient,
        connect_codes: Arc<ConnectCodeStore>,
        deposit_sessions: Arc<DepositSessionStore>,
        event_tx: NotificationSender,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            mailbox,
            connect_codes,
            deposit_sessions,
            event_tx,
            shutdown_rx,
        }
    }

    /// Run the InboxWatcher.
    pub async fn run(mut self) {
        info!("InboxWatcher started");

        loop {
            if !super::sleep_or_shutdown(&mut self.shutdown_rx, POLL_INTERVAL).await {
                break;
            }
            self.poll_cycle().await;
        }

        info!("InboxWatcher shutdown complete");
    }

    async fn poll_cycle(&self) {
        let now = OffsetDateTime::now_utc();

        for id in self.deposit_sessions.sweep_expired(now) {
            info!(request_id = %id, "Deposit session expired without a payment");
        }
        self.connect_codes.sweep(now);

        // No live sessions means nothing to match against.
        if self.deposit_sessions.is_empty() {
            return;
        }

        let emails = match self.mailbox.fetch_recent(EMAIL_WINDOW).await {
            Ok(emails) => emails,
            Err(e) => {
                error!(error = %e, "Mailbox poll failed");
                return;
            }
        };

        for email in &emails {
            let Some(payment) = parse_payment_email(&email.subject, &email.body) else {
                debug!(subject = %email.subject, "Email did not parse as a payment alert");
                continue;
            };

            let matched = self.deposit_sessions.try_match(
                payment.amount,
                payment.sender_name.clone(),
                OffsetDateTime::now_utc(),
            );
            let Some((request_id, session)) = matched else {
                warn!(amount = %payment.amount, "Payment email matched no deposit session");
                continue;
            };

            info!(
                request_id = %request_id,
                amount = %payment.amount,
                "Payment matched to deposit session"
            );

            let event = NotificationEvent::ApprovalRequest {
                request_id,
                session,
                amount: payment.amount,
                sender_name: payment.sender_name.clone(),
            };
            if self.event_tx.send(event).await.is_err() {
                warn!("Notification channel closed, dropping approval request");
                return;
            }
        }
    }
}
