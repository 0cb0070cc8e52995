//! Failure types for lifecycle operations and moves.
//!
//! Neither type is fatal to the drop timer or the input router: callers log
//! and carry on. The controller also records the display message of every
//! failure in its error slot.

use thiserror::Error;

use crate::api::ApiError;
use crate::types::GameStatus;

/// A payload that cannot be applied to the current session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("board is {actual_width}x{actual_height}, session is {width}x{height}")]
    BoardShape {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no game has been started")]
    NoSession,

    #[error("sign in to save scores: {0}")]
    AuthRequired(#[source] ApiError),

    #[error("failed to create game: {0}")]
    Create(#[source] ApiError),

    #[error("failed to load game: {0}")]
    Fetch(#[source] ApiError),

    #[error("failed to pause game: {0}")]
    Pause(#[source] ApiError),

    #[error("failed to forfeit game: {0}")]
    Forfeit(#[source] ApiError),

    #[error(transparent)]
    Malformed(#[from] ReconcileError),
}

impl SessionError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SessionError::AuthRequired(e)
            | SessionError::Create(e)
            | SessionError::Fetch(e)
            | SessionError::Pause(e)
            | SessionError::Forfeit(e) => e.status_code(),
            SessionError::NoSession | SessionError::Malformed(_) => None,
        }
    }

    /// Creation was refused only for lack of credentials; unscored play is
    /// still possible.
    pub fn is_auth_required(&self) -> bool {
        matches!(self, SessionError::AuthRequired(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MoveError {
    #[error("move failed: {0}")]
    Request(#[source] ApiError),

    #[error("failed to refresh game after move: {0}")]
    Refresh(#[source] ApiError),

    #[error(transparent)]
    Malformed(#[from] ReconcileError),
}

impl MoveError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MoveError::Request(e) | MoveError::Refresh(e) => e.status_code(),
            MoveError::Malformed(_) => None,
        }
    }
}

/// Why a move was not sent. Not an error: nothing is shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    NoSession,
    NoSnapshot,
    NotOngoing(GameStatus),
    Paused,
    HoldUnavailable,
    InFlight,
}

impl std::fmt::Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precondition::NoSession => f.write_str("no session"),
            Precondition::NoSnapshot => f.write_str("no snapshot"),
            Precondition::NotOngoing(s) => write!(f, "game is {}", s.as_str()),
            Precondition::Paused => f.write_str("paused"),
            Precondition::HoldUnavailable => f.write_str("hold unavailable"),
            Precondition::InFlight => f.write_str("move in flight"),
        }
    }
}
