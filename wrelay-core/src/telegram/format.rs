//! Message text and keyboard builders.
//!
//! All user-facing copy lives here so the processors stay readable.

use super::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::events::TransactionNotice;
use crate::sessions::DepositSession;
use rust_decimal::Decimal;

/// Emoji pair `(type, status)` for a transaction alert.
pub fn transaction_emoji(kind: &str, success: bool) -> (&'static str, &'static str) {
    if !success {
        return ("⚠️", "❌");
    }
    let type_emoji = match kind.to_lowercase().as_str() {
        "send_credit" | "api_debit" => "🏧",
        "addfund" => "📥",
        "withdraw" => "📤",
        "lifafa_win" => "🎉",
        "lifafa_create" => "🧧",
        "lifafa_refund" => "↩️",
        _ => "⭐",
    };
    (type_emoji, "✅")
}

pub fn transaction_alert(notice: &TransactionNotice) -> String {
    let success = notice.status.eq_ignore_ascii_case("success");
    let (type_emoji, status_emoji) = transaction_emoji(&notice.kind, success);
    format!(
        "💰 Transaction Alert!\n\n\
         {type_emoji} Type: {kind}\n\
         💵 Amount: ₹{amount}\n\
         {status_emoji} Status: {status}\n\
         👤 Sender: {sender}\n\
         💬 Comment: {comment}\n\n\
         💼 New Balance: ₹{balance}",
        kind = notice.kind,
        amount = notice.amount,
        status = notice.status,
        sender = notice.sender,
        comment = notice.comment,
        balance = notice.balance,
    )
}

pub fn welcome(first_name: &str) -> String {
    format!(
        "👋 Hello {first_name}!\n\n\
         Welcome to the wallet bot. 💼\n\
         You will receive notifications for all your wallet transactions here.\n\n\
         Use /help to see available commands."
    )
}

pub fn help_text(bot_username: &str) -> String {
    format!(
        "📝 Available Commands:\n\n\
         • /start - Start the bot\n\
         • /help - Show this help message\n\
         • /id - Get your Telegram ID\n\
         • /chatid - Get a channel's numeric chat ID\n\n\
         🤖 Bot: @{bot_username}\n\n\
         💡 All wallet transactions will be notified automatically here."
    )
}

pub fn connect_success(display_name: &str, telegram_id: i64) -> String {
    format!(
        "✅ Connected Successfully!\n\n\
         👤 Account: {display_name}\n\
         🆔 Telegram ID: {telegram_id}\n\n\
         You'll now receive alerts for:\n\
         • 💰 Transactions\n\
         • 📥 Fund request updates\n\
         • 📤 Withdrawal updates\n\
         • 🎉 Lifafa wins\n\n\
         Welcome aboard! 🚀"
    )
}

pub const CONNECT_FAILED: &str = "⚠️ Connection failed. Please try again from the wallet.";
pub const CONNECT_CODE_SPENT: &str = "⚠️ This connect link has expired or already been used.";
pub const SESSION_GONE: &str = "⚠️ Session expired or not found.";
pub const CHATID_USAGE: &str =
    "Forward any message from your private channel to get its Chat ID.";

pub fn chatid_reply(title: &str, chat_id: i64) -> String {
    format!(
        "📢 Channel: {title}\n\
         🆔 Chat ID: <code>{chat_id}</code>\n\n\
         Use this numeric ID when adding a private channel in the wallet."
    )
}

pub fn approval_request(
    session: &DepositSession,
    amount: Decimal,
    bonus: Decimal,
    sender_name: Option<&str>,
) -> String {
    format!(
        "💰 Payment Detected!\n\n\
         👤 User: {user}\n\
         💵 Amount: ₹{amount}\n\
         👨 Sender: {sender}\n\
         🎁 Bonus: +₹{bonus}\n\
         ✅ Total to credit: ₹{total}\n\n\
         Approve this deposit?",
        user = session.display_name,
        sender = sender_name.unwrap_or("Unknown"),
        total = amount + bonus,
    )
}

pub fn deposit_approved_user(
    amount: Decimal,
    bonus: Decimal,
    new_balance: Decimal,
) -> String {
    format!(
        "✅ Deposit Approved!\n\n\
         💰 Amount: ₹{amount}\n\
         🎁 Bonus: +₹{bonus}\n\
         ✅ Total credited: ₹{total}\n\
         💼 New Balance: ₹{new_balance}\n\n\
         Thank you for using the wallet! 🚀",
        total = amount + bonus,
    )
}

pub fn deposit_declined_user(amount: Decimal) -> String {
    format!(
        "❌ Deposit Declined\n\n\
         💵 Amount: ₹{amount}\n\n\
         Your deposit request was declined. \
         Please contact support if you believe this is an error."
    )
}

pub fn approved_summary(
    display_name: &str,
    amount: Decimal,
    bonus: Decimal,
    new_balance: Decimal,
) -> String {
    format!(
        "✅ Approved!\n\n\
         👤 {display_name}\n\
         💵 ₹{total} credited (₹{amount} + ₹{bonus} bonus)\n\
         💼 New Balance: ₹{new_balance}",
        total = amount + bonus,
    )
}

pub fn declined_summary(display_name: &str, amount: Decimal) -> String {
    format!(
        "❌ Declined\n\n\
         👤 {display_name}\n\
         💵 ₹{amount} request declined"
    )
}

/// The "Open Wallet" mini-app button attached to most user messages.
pub fn open_wallet_keyboard(miniapp_url: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::single(InlineKeyboardButton::web_app("💼 Open Wallet", miniapp_url))
}

/// Approve / decline buttons for the admin group.
pub fn approval_keyboard(request_id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::row(vec![
        InlineKeyboardButton::callback("✅ Approve", format!("approve_{request_id}")),
        InlineKeyboardButton::callback("❌ Decline", format!("decline_{request_id}")),
    ])
}

/// Link to the admin panel, attached to admin alerts.
pub fn admin_panel_keyboard(miniapp_url: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::single(InlineKeyboardButton::url(
        "🔧 Admin Panel",
        format!("{miniapp_url}/admin"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emoji_follows_transaction_type() {
        assert_eq!(transaction_emoji("addfund", true), ("📥", "✅"));
        assert_eq!(transaction_emoji("WITHDRAW", true), ("📤", "✅"));
        assert_eq!(transaction_emoji("lifafa_win", true), ("🎉", "✅"));
        assert_eq!(transaction_emoji("send_credit", true), ("🏧", "✅"));
        assert_eq!(transaction_emoji("something_else", true), ("⭐", "✅"));
    }

    #[test]
    fn failed_transactions_get_warning_emoji() {
        assert_eq!(transaction_emoji("addfund", false), ("⚠️", "❌"));
    }

    #[test]
    fn approval_keyboard_carries_request_id() {
        let keyboard = approval_keyboard("req-9");
        let row = &keyboard.inline_keyboard[0];
        assert_eq!(row[0].callback_data.as_deref(), Some("approve_req-9"));
        assert_eq!(row[1].callback_data.as_deref(), Some("decline_req-9"));
    }
}
