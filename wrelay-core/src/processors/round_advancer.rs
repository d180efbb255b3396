//! RoundAdvancer processor.
//!
//! Drives the game round lifecycle against the backend: open a round with a
//! betting deadline, wait out the betting window, resolve it with a random
//! outcome, then pause before the next round. Backend failures pause and
//! retry rather than stopping the loop.

use crate::backend::types::RoundResult;
use crate::backend::BackendClient;
use crate::config::GameConfig;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// RoundAdvancer keeps game rounds moving on the backend.
pub struct RoundAdvancer {
    backend: Arc<BackendClient>,
    game: GameConfig,
    shutdown_rx: watch::Receiver<bool>,
}

impl RoundAdvancer {
    pub fn new(
        backend: Arc<BackendClient>,
        game: GameConfig,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            backend,
            game,
            shutdown_rx,
        }
    }

    /// Run the RoundAdvancer.
    pub async fn run(mut self) {
        info!(
            betting_secs = self.game.betting_secs,
            pause_secs = self.game.pause_secs,
            "RoundAdvancer started"
        );

        let betting = Duration::from_secs(self.game.betting_secs);
        let pause = Duration::from_secs(self.game.pause_secs);

        loop {
            let ends_at = OffsetDateTime::now_utc() + betting;
            let round_id = match self.backend.create_game_round(ends_at).await {
                Ok(Some(id)) => id,
                Ok(None) => {
                    warn!("Backend returned no round id, retrying after pause");
                    if !super::sleep_or_shutdown(&mut self.shutdown_rx, pause).await {
                        break;
                    }
                    continue;
                }
                Err(e) => {
                    error!(error = %e, "Failed to create game round");
                    if !super::sleep_or_shutdown(&mut self.shutdown_rx, pause).await {
                        break;
                    }
                    continue;
                }
            };

            if !super::sleep_or_shutdown(&mut self.shutdown_rx, betting).await {
                break;
            }

            let result = RoundResult::random();
            match self.backend.resolve_round(round_id, result).await {
                Ok(()) => info!(round_id = %round_id, result = %result, "Round resolved"),
                Err(e) => error!(round_id = %round_id, error = %e, "Failed to resolve round"),
            }

            if !super::sleep_or_shutdown(&mut self.shutdown_rx, pause).await {
                break;
            }
        }

        info!("RoundAdvancer shutdown complete");
    }
}
