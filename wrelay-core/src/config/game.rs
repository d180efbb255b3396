//! Game round configuration.

/// Settings for the big/small round advancer. The whole section is
/// optional; when absent, no rounds are advanced.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Seconds a round stays open for betting.
    pub betting_secs: u64,
    /// Pause between rounds, and the back-off after a failed create.
    pub pause_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            betting_secs: 10,
            pause_secs: 3,
        }
    }
}
