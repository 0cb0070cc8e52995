//! Request and response payloads for the backend REST contract.
//!
//! | Method | Path | Request | Response |
//! |--------|------|---------|----------|
//! | `POST` | `/tetris` | [`CreateGameRequest`] | [`CreateGameResponse`] |
//! | `GET` | `/tetris/{id}` | - | [`StatusResponse`] |
//! | `POST` | `/tetris/{id}/moves` | [`MoveRequest`] | [`MoveResponse`] |
//! | `POST` | `/tetris/{id}/pause` | [`PauseRequest`] | [`PauseResponse`] |
//! | `DELETE` | `/tetris/{id}` | - | [`ForfeitResponse`] |
//!
//! Error bodies carry a `detail` string and sometimes a `status_code`.

use serde::{Deserialize, Serialize};

use crate::{Board, GameStatus, MoveType, Piece};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub game_id: u64,
    pub width: u32,
    pub height: u32,
    pub level: u32,
}

/// Full game state as returned by `GET /tetris/{id}`.
///
/// `held_piece` and `can_hold` are optional: the backend uses null both for
/// "empty" and for "not reported".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub board: Board,
    #[serde(default)]
    pub current_piece: Option<Piece>,
    #[serde(default)]
    pub next_piece: Option<Piece>,
    #[serde(default)]
    pub held_piece: Option<Piece>,
    pub score: u64,
    pub level: u32,
    pub lines_cleared: u32,
    #[serde(default)]
    pub can_hold: Option<bool>,
    pub status: GameStatus,
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Body of `POST /tetris/{id}/moves`.
///
/// The two hold flags are only serialized when set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub move_type: MoveType,
    /// Empty the hold slot by moving its piece into play.
    #[serde(default, skip_serializing_if = "is_false")]
    pub clear_hold: bool,
    /// Do not push the current piece into the hold slot.
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_store: bool,
}

impl MoveRequest {
    pub fn new(move_type: MoveType) -> Self {
        Self {
            move_type,
            clear_hold: false,
            skip_store: false,
        }
    }

    /// A hold that pops the stored piece instead of storing the current one.
    pub fn hold_pop() -> Self {
        Self {
            move_type: MoveType::Hold,
            clear_hold: true,
            skip_store: true,
        }
    }

    pub fn is_hold_pop(&self) -> bool {
        self.move_type == MoveType::Hold && self.clear_hold
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub board: Board,
    #[serde(default)]
    pub current_piece: Option<Piece>,
    #[serde(default)]
    pub next_piece: Option<Piece>,
    #[serde(default)]
    pub held_piece: Option<Piece>,
    pub score: u64,
    pub level: u32,
    pub lines_cleared: u32,
    #[serde(default)]
    pub can_hold: Option<bool>,
    pub status: GameStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseRequest {
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseResponse {
    pub game_id: u64,
    pub status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitResponse {
    pub game_id: u64,
    #[serde(default)]
    pub score: Option<u64>,
    #[serde(default)]
    pub status: Option<GameStatus>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}
