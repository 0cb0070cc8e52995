//! The controller's single mutable state value.

use std::sync::Arc;

use crate::types::{GameSession, GameStateSnapshot, GameStatus};

/// Everything the controller knows about the current game.
///
/// Published through a `tokio::sync::watch` channel; readers always see the
/// latest value and are only woken when something actually changed.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    pub session: Option<GameSession>,
    pub snapshot: Option<Arc<GameStateSnapshot>>,
    /// Client-side mirror of `status == paused`.
    pub paused: bool,
    /// Last failure message, until dismissed or the next operation starts.
    pub error: Option<String>,
    /// Bumped whenever the current session changes; responses that resolve
    /// under an older epoch are dropped.
    pub epoch: u64,
    /// Playing without credentials; scores are not saved.
    pub unscored: bool,
}

impl ControllerState {
    pub fn status(&self) -> Option<GameStatus> {
        self.snapshot.as_ref().map(|s| s.status)
    }

    pub fn session_id(&self) -> Option<u64> {
        self.session.map(|s| s.id)
    }

    /// Session and snapshot present, game ongoing, not paused.
    ///
    /// The drop timer and the input router run only while this holds.
    pub fn is_active(&self) -> bool {
        self.session.is_some() && self.status() == Some(GameStatus::Ongoing) && !self.paused
    }

    /// The level to drop at, or `None` when the drop timer must be stopped.
    pub fn drop_gate(&self) -> Option<u32> {
        if !self.is_active() {
            return None;
        }
        self.snapshot.as_ref().map(|s| s.level)
    }

    /// A game exists that is not over yet.
    pub fn has_active_game(&self) -> bool {
        self.session.is_some()
            && matches!(
                self.status(),
                Some(GameStatus::Ongoing) | Some(GameStatus::Paused)
            )
    }

    pub fn is_game_over(&self) -> bool {
        self.status() == Some(GameStatus::GameOver)
    }
}
