//! One-time connect codes.
//!
//! The wallet frontend requests a connect link; the user opens the bot with
//! `/start <code>` and the code is redeemed exactly once. Codes older than
//! [`CONNECT_CODE_TTL`] are rejected and removed by age-based sweeps.

use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use time::{Duration, OffsetDateTime};

/// How long a connect code stays redeemable.
pub const CONNECT_CODE_TTL: Duration = Duration::seconds(600);

/// Number of random bytes behind each code (before base64url encoding).
const CODE_BYTES: usize = 16;

/// A pending link request from the wallet frontend.
#[derive(Debug, Clone)]
pub struct PendingConnect {
    /// The website account id that asked for the link.
    pub user_id: String,
    /// Display name shown in the connected confirmation.
    pub display_name: String,
    /// When the code was issued.
    pub created_at: OffsetDateTime,
}

/// Keyed store of pending connect codes.
///
/// Each entry is redeemable at most once: [`take`](Self::take) removes it.
#[derive(Default)]
pub struct ConnectCodeStore {
    inner: Mutex<HashMap<String, PendingConnect>>,
}

impl ConnectCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh code for a link request, sweeping stale entries first.
    pub fn issue(&self, user_id: String, display_name: String, now: OffsetDateTime) -> String {
        let code = generate_code();
        let mut inner = self.lock();
        inner.retain(|_, pending| now - pending.created_at <= CONNECT_CODE_TTL);
        inner.insert(
            code.clone(),
            PendingConnect {
                user_id,
                display_name,
                created_at: now,
            },
        );
        code
    }

    /// Redeem a code. Returns the pending request iff the code exists and is
    /// still live; the entry is removed either way, so a code can never be
    /// redeemed twice.
    pub fn take(&self, code: &str, now: OffsetDateTime) -> Option<PendingConnect> {
        let pending = self.lock().remove(code)?;
        if now - pending.created_at > CONNECT_CODE_TTL {
            return None;
        }
        Some(pending)
    }

    /// Remove entries older than [`CONNECT_CODE_TTL`].
    pub fn sweep(&self, now: OffsetDateTime) {
        self.lock()
            .retain(|_, pending| now - pending.created_at <= CONNECT_CODE_TTL);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PendingConnect>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// URL-safe random token, suitable for a `t.me/...?start=` deep link.
fn generate_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    rand::rng().fill(&mut bytes);
    fast32::base64::RFC4648_URL_NOPAD.encode(&bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn t0() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    #[test]
    fn code_is_taken_at_most_once() {
        let store = ConnectCodeStore::new();
        let code = store.issue("user-1".into(), "User".into(), t0());

        let pending = store.take(&code, t0()).unwrap();
        assert_eq!(pending.user_id, "user-1");
        assert!(store.take(&code, t0()).is_none());
    }

    #[test]
    fn expired_code_is_rejected() {
        let store = ConnectCodeStore::new();
        let code = store.issue("user-1".into(), "User".into(), t0());

        let late = t0() + CONNECT_CODE_TTL + Duration::seconds(1);
        assert!(store.take(&code, late).is_none());
    }

    #[test]
    fn code_at_ttl_boundary_is_still_live() {
        let store = ConnectCodeStore::new();
        let code = store.issue("user-1".into(), "User".into(), t0());

        assert!(store.take(&code, t0() + CONNECT_CODE_TTL).is_some());
    }

    #[test]
    fn sweep_removes_only_stale_entries() {
        let store = ConnectCodeStore::new();
        let old = store.issue("old".into(), "Old".into(), t0());
        let fresh = store.issue(
            "fresh".into(),
            "Fresh".into(),
            t0() + Duration::seconds(500),
        );

        store.sweep(t0() + Duration::seconds(700));
        assert!(store.take(&old, t0() + Duration::seconds(700)).is_none());
        assert!(store.take(&fresh, t0() + Duration::seconds(700)).is_some());
    }

    #[test]
    fn codes_are_unique_and_url_safe() {
        let store = ConnectCodeStore::new();
        let a = store.issue("u".into(), "U".into(), t0());
        let b = store.issue("u".into(), "U".into(), t0());

        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
