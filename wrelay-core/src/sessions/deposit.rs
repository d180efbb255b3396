//! Deposit-matching sessions.
//!
//! When the user clicks "I've Paid" the frontend opens a session here; the
//! inbox watcher then tries to match incoming payment emails to live
//! sessions by amount, within a fixed tolerance window. A session moves
//! from unmatched to matched at most once, and unmatched sessions past
//! their expiry are removed by age-based sweeps. Matched sessions survive
//! sweeps until an admin approves or declines them.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use time::{Duration, OffsetDateTime};

/// How long a session waits for a payment email before expiring.
pub const DEPOSIT_SESSION_TTL: Duration = Duration::seconds(300);

/// A deposit session awaiting an inbound payment-confirmation email.
#[derive(Debug, Clone)]
pub struct DepositSession {
    /// The website account id to credit.
    pub user_id: String,
    /// Display name shown in admin messages.
    pub display_name: String,
    /// Amount the user claims to have paid.
    pub amount: Decimal,
    /// Telegram chat id for user notifications, when the account is linked.
    pub telegram_id: Option<String>,
    /// When the matching window closes.
    pub expires_at: OffsetDateTime,
    /// Whether a payment email has been matched to this session.
    pub matched: bool,
    /// Sender name extracted from the matched email.
    pub sender_name: Option<String>,
    /// Insertion order, used to break ties between candidate matches.
    seq: u64,
}

/// Fields supplied by the frontend when a session starts.
#[derive(Debug, Clone)]
pub struct NewDepositSession {
    pub user_id: String,
    pub display_name: String,
    pub amount: Decimal,
    pub telegram_id: Option<String>,
}

/// Keyed store of deposit sessions, indexed by payment-request id.
#[derive(Default)]
pub struct DepositSessionStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, DepositSession>,
    next_seq: u64,
}

impl DepositSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a matching window for a payment request. Re-registering the same
    /// request id replaces the previous session.
    pub fn start(&self, request_id: String, new: NewDepositSession, now: OffsetDateTime) {
        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.sessions.insert(
            request_id,
            DepositSession {
                user_id: new.user_id,
                display_name: new.display_name,
                amount: new.amount,
                telegram_id: new.telegram_id,
                expires_at: now + DEPOSIT_SESSION_TTL,
                matched: false,
                sender_name: None,
                seq,
            },
        );
    }

    /// Match an email amount to a live unmatched session.
    ///
    /// The amounts must agree within [`Self::tolerance`]. When several
    /// sessions qualify, the oldest registration wins. The winning session
    /// transitions to matched, and that transition happens at most once
    /// per session.
    pub fn try_match(
        &self,
        amount: Decimal,
        sender_name: Option<String>,
        now: OffsetDateTime,
    ) -> Option<(String, DepositSession)> {
        let tolerance = Self::tolerance();
        let mut inner = self.lock();
        let (request_id, session) = inner
            .sessions
            .iter_mut()
            .filter(|(_, s)| !s.matched && now < s.expires_at)
            .filter(|(_, s)| (s.amount - amount).abs() < tolerance)
            .min_by_key(|(_, s)| s.seq)?;

        session.matched = true;
        session.sender_name = sender_name;
        Some((request_id.clone(), session.clone()))
    }

    /// Remove unmatched sessions whose window has closed, returning their ids.
    /// Matched sessions are kept until explicitly removed.
    pub fn sweep_expired(&self, now: OffsetDateTime) -> Vec<String> {
        let mut expired = Vec::new();
        self.lock().sessions.retain(|id, session| {
            if !session.matched && now >= session.expires_at {
                expired.push(id.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// Look up a session without removing it.
    pub fn get(&self, request_id: &str) -> Option<DepositSession> {
        self.lock().sessions.get(request_id).cloned()
    }

    /// Final removal, after an admin approves or declines the deposit.
    pub fn remove(&self, request_id: &str) -> Option<DepositSession> {
        self.lock().sessions.remove(request_id)
    }

    pub fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().sessions.is_empty()
    }

    /// Amounts within this window of each other are considered equal.
    fn tolerance() -> Decimal {
        Decimal::new(5, 1)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn t0() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    fn new_session(amount: Decimal) -> NewDepositSession {
        NewDepositSession {
            user_id: "user-1".into(),
            display_name: "XID123".into(),
            amount,
            telegram_id: Some("42".into()),
        }
    }

    #[test]
    fn matches_within_tolerance() {
        let store = DepositSessionStore::new();
        store.start("req-1".into(), new_session(dec!(100)), t0());

        let matched = store.try_match(dec!(100.49), Some("KUSUM".into()), t0());
        let (id, session) = matched.unwrap();
        assert_eq!(id, "req-1");
        assert!(session.matched);
        assert_eq!(session.sender_name.as_deref(), Some("KUSUM"));
    }

    #[test]
    fn rejects_amounts_at_or_past_tolerance() {
        let store = DepositSessionStore::new();
        store.start("req-1".into(), new_session(dec!(100)), t0());

        assert!(store.try_match(dec!(100.5), None, t0()).is_none());
        assert!(store.try_match(dec!(99.5), None, t0()).is_none());
        assert!(store.try_match(dec!(99.51), None, t0()).is_some());
    }

    #[test]
    fn session_matches_at_most_once() {
        let store = DepositSessionStore::new();
        store.start("req-1".into(), new_session(dec!(50)), t0());

        assert!(store.try_match(dec!(50), None, t0()).is_some());
        assert!(store.try_match(dec!(50), None, t0()).is_none());
    }

    #[test]
    fn oldest_candidate_wins_when_several_qualify() {
        let store = DepositSessionStore::new();
        store.start("first".into(), new_session(dec!(75)), t0());
        store.start("second".into(), new_session(dec!(75)), t0());

        let (id, _) = store.try_match(dec!(75), None, t0()).unwrap();
        assert_eq!(id, "first");

        let (id, _) = store.try_match(dec!(75), None, t0()).unwrap();
        assert_eq!(id, "second");
    }

    #[test]
    fn expired_sessions_do_not_match() {
        let store = DepositSessionStore::new();
        store.start("req-1".into(), new_session(dec!(10)), t0());

        let late = t0() + DEPOSIT_SESSION_TTL;
        assert!(store.try_match(dec!(10), None, late).is_none());
    }

    #[test]
    fn sweep_removes_expired_unmatched_but_keeps_matched() {
        let store = DepositSessionStore::new();
        store.start("stale".into(), new_session(dec!(10)), t0());
        store.start("paid".into(), new_session(dec!(20)), t0());
        store.try_match(dec!(20), None, t0()).unwrap();

        let late = t0() + DEPOSIT_SESSION_TTL + Duration::seconds(1);
        let expired = store.sweep_expired(late);

        assert_eq!(expired, vec!["stale".to_string()]);
        assert!(store.get("paid").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn restart_replaces_previous_session() {
        let store = DepositSessionStore::new();
        store.start("req-1".into(), new_session(dec!(10)), t0());
        store.start("req-1".into(), new_session(dec!(999)), t0());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("req-1").unwrap().amount, dec!(999));
    }

    #[test]
    fn remove_is_final() {
        let store = DepositSessionStore::new();
        store.start("req-1".into(), new_session(dec!(10)), t0());

        assert!(store.remove("req-1").is_some());
        assert!(store.remove("req-1").is_none());
        assert!(store.is_empty());
    }
}
