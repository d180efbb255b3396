//! Mailbox configuration.

/// IMAP inbox settings. The account password is a secret and is passed to
/// the mailbox client directly, never stored here.
#[derive(Debug, Clone)]
pub struct MailboxSettings {
    /// IMAP host, e.g. `imap.gmail.com`.
    pub host: String,
    /// Login user / email address.
    pub user: String,
    /// Only emails from this sender are considered payment confirmations.
    pub sender_filter: String,
}
