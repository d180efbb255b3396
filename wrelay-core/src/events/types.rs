//! Event type definitions.

use crate::sessions::DepositSession;
use rust_decimal::Decimal;

/// A wallet transaction to relay to its owner.
///
/// The backend already formats amounts and balances for display, so they
/// are carried as opaque strings.
#[derive(Debug, Clone)]
pub struct TransactionNotice {
    /// Telegram chat id of the wallet owner.
    pub chat_id: String,
    /// Transaction type, e.g. `addfund`, `withdraw`, `lifafa_win`.
    pub kind: String,
    pub amount: String,
    pub status: String,
    pub sender: String,
    pub comment: String,
    pub balance: String,
}

/// Outbound Telegram work consumed by the Notifier.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    /// Relay a transaction alert to the wallet owner.
    Transaction(TransactionNotice),
    /// Alert the admin chat.
    Admin { message: String },
    /// Ask the admin group to approve a matched deposit.
    ApprovalRequest {
        request_id: String,
        session: DepositSession,
        amount: Decimal,
        sender_name: Option<String>,
    },
}
