//! Volatile in-memory session bookkeeping.
//!
//! Two short-lived keyed stores back the wallet relay:
//!
//! - [`ConnectCodeStore`]: one-time connect codes linking a web account
//!   to a Telegram chat.
//! - [`DepositSessionStore`]: time-bounded deposit sessions awaiting an
//!   inbound payment-confirmation email.
//!
//! Both stores are swept by simple age-based passes. Nothing here is
//! persisted; a process restart drops all open sessions.

mod connect;
mod deposit;

pub use connect::{CONNECT_CODE_TTL, ConnectCodeStore, PendingConnect};
pub use deposit::{
    DEPOSIT_SESSION_TTL, DepositSession, DepositSessionStore, NewDepositSession,
};
