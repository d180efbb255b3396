//! IMAP mailbox polling.
//!
//! Payment confirmations arrive as emails from the payment provider. The
//! inbox is polled for unread, sender-matched messages inside a recent
//! time window; subject and text bodies are extracted for amount parsing.
//!
//! The `imap` session is blocking, so each fetch runs on the tokio
//! blocking pool.

pub mod parse;

use mailparse::{MailHeaderMap, ParsedMail};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// IMAP-over-TLS port.
const IMAP_PORT: u16 = 993;

/// Errors from mailbox polling.
#[derive(Debug, Error)]
pub enum MailboxError {
    /// TLS setup error
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// IMAP protocol or connection error
    #[error("IMAP error: {0}")]
    Imap(#[from] imap::Error),

    /// RFC822 message could not be parsed
    #[error("message parse error: {0}")]
    Parse(#[from] mailparse::MailParseError),

    /// The blocking fetch task was cancelled
    #[error("mailbox task cancelled")]
    Cancelled,
}

/// A fetched email, reduced to what amount parsing needs.
#[derive(Debug, Clone)]
pub struct InboundEmail {
    pub subject: String,
    pub body: String,
}

/// Polling client for a single IMAP inbox.
#[derive(Clone)]
pub struct MailboxClient {
    host: String,
    user: String,
    password: String,
    sender_filter: String,
}

impl MailboxClient {
    /// `sender_filter` restricts fetches to messages from that address.
    pub fn new(host: String, user: String, password: String, sender_filter: String) -> Self {
        Self {
            host,
            user,
            password,
            sender_filter,
        }
    }

    /// Fetch unread sender-matched emails received within `window`.
    pub async fn fetch_recent(&self, window: Duration) -> Result<Vec<InboundEmail>, MailboxError> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.fetch_blocking(window))
            .await
            .map_err(|_| MailboxError::Cancelled)?
    }

    fn fetch_blocking(&self, window: Duration) -> Result<Vec<InboundEmail>, MailboxError> {
        let tls = native_tls::TlsConnector::builder().build()?;
        let client = imap::connect((self.host.as_str(), IMAP_PORT), self.host.as_str(), &tls)?;
        let mut session = client
            .login(&self.user, &self.password)
            .map_err(|(err, _)| err)?;
        session.select("INBOX")?;

        // SEARCH SINCE has day granularity; the session sweep handles the
        // finer-grained expiry.
        let since = imap_since_date(OffsetDateTime::now_utc() - window);
        let query = format!("FROM \"{}\" SINCE {} UNSEEN", self.sender_filter, since);
        let ids = session.search(&query)?;

        let mut emails = Vec::new();
        for id in ids {
            let fetches = session.fetch(id.to_string(), "RFC822")?;
            for fetch in fetches.iter() {
                let Some(raw) = fetch.body() else { continue };
                let parsed = mailparse::parse_mail(raw)?;
                emails.push(InboundEmail {
                    subject: parsed
                        .headers
                        .get_first_value("Subject")
                        .unwrap_or_default(),
                    body: extract_text(&parsed)?,
                });
            }
        }

        let _ = session.logout();
        Ok(emails)
    }
}

/// Concatenate every text part of a (possibly multipart) message.
fn extract_text(mail: &ParsedMail<'_>) -> Result<String, mailparse::MailParseError> {
    if mail.subparts.is_empty() {
        return mail.get_body();
    }
    let mut text = String::new();
    for part in &mail.subparts {
        if part.ctype.mimetype.starts_with("text/") {
            text.push_str(&part.get_body()?);
        } else if !part.subparts.is_empty() {
            text.push_str(&extract_text(part)?);
        }
    }
    Ok(text)
}

/// Format a date the way IMAP `SEARCH SINCE` expects, e.g. `02-Aug-2026`.
fn imap_since_date(at: OffsetDateTime) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let month = MONTHS[u8::from(at.month()) as usize - 1];
    format!("{:02}-{}-{}", at.day(), month, at.year())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn since_date_uses_imap_format() {
        let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        // 2023-11-14 22:13:20 UTC
        assert_eq!(imap_since_date(at), "14-Nov-2023");
    }

    #[test]
    fn since_date_zero_pads_the_day() {
        let at = OffsetDateTime::from_unix_timestamp(1_704_153_600).unwrap();
        // 2024-01-02 00:00:00 UTC
        assert_eq!(imap_since_date(at), "02-Jan-2024");
    }
}
