//! Background loops.
//!
//! Each processor owns a `run` loop that selects on a shared shutdown
//! signal:
//!
//! - `Notifier`: receives `NotificationEvent`, performs Telegram sends
//! - `UpdatePoller`: long-polls `getUpdates`, handles commands and
//!   approve/decline callbacks
//! - `InboxWatcher`: sweeps session stores and matches payment emails to
//!   deposit sessions
//! - `RoundAdvancer`: opens and resolves big/small game rounds on a fixed
//!   cadence

pub mod inbox_watcher;
pub mod notifier;
pub mod round_advancer;
pub mod update_poller;

pub use inbox_watcher::InboxWatcher;
pub use notifier::Notifier;
pub use round_advancer::RoundAdvancer;
pub use update_poller::UpdatePoller;

use tokio::sync::watch;

/// Sleep for `duration`, returning `false` early if shutdown is signaled.
pub(crate) async fn sleep_or_shutdown(
    shutdown_rx: &mut watch::Receiver<bool>,
    duration: std::time::Duration,
) -> bool {
    let sleep = tokio::time::sleep(duration);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    return false;
                }
            }

            _ = &mut sleep => return true,
        }
    }
}
