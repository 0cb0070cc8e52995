//! Shared data types for the Tetris REST client.
//!
//! Everything here is plain data with serde derives, usable from the API
//! layer, the controller, the input router and the terminal shell alike.
//! The backend owns the game rules; these types only describe what it
//! reports and what the client asks of it.
//!
//! # Board
//!
//! The board is a row-major grid of color indices:
//!
//! | Value | Meaning |
//! |-------|---------|
//! | `0` | Empty cell |
//! | `1` | I |
//! | `2` | J |
//! | `3` | L |
//! | `4` | O |
//! | `5` | S |
//! | `6` | T |
//! | `7` | Z |
//!
//! # Drop cadence
//!
//! The client synthesizes `down` moves on a timer whose period shrinks with
//! the level:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 900ms |
//! | 5 | 600ms |
//! | 10+ | 100ms (floor) |
//!
//! # Examples
//!
//! ```
//! use tetris_client_types::{drop_interval_ms, MoveType, PieceKind};
//!
//! assert_eq!(MoveType::from_str("hard_drop"), Some(MoveType::HardDrop));
//! assert_eq!(MoveType::Hold.as_str(), "hold");
//!
//! assert_eq!(PieceKind::from_color(6), Some(PieceKind::T));
//!
//! assert_eq!(drop_interval_ms(1), 1000);
//! assert_eq!(drop_interval_ms(12), 100);
//! ```

use serde::{Deserialize, Serialize};

pub mod wire;

pub use wire::*;

/// Default board width used when adopting a session without a board.
pub const DEFAULT_BOARD_WIDTH: u32 = 10;

/// Default board height used when adopting a session without a board.
pub const DEFAULT_BOARD_HEIGHT: u32 = 20;

/// Drop interval at level 1.
pub const BASE_DROP_MS: u64 = 1000;

/// Interval reduction per level above 1.
pub const DROP_STEP_MS: u64 = 100;

/// The drop interval never goes below this.
pub const DROP_INTERVAL_MIN_MS: u64 = 100;

/// Gravity period for a level: `max(100, 1000 - (level - 1) * 100)`.
///
/// Levels below 1 are treated as level 1.
pub fn drop_interval_ms(level: u32) -> u64 {
    let steps = u64::from(level.max(1) - 1);
    BASE_DROP_MS
        .saturating_sub(steps.saturating_mul(DROP_STEP_MS))
        .max(DROP_INTERVAL_MIN_MS)
}

/// A cell value on the board (0 = empty, 1-7 = piece color).
pub type Cell = u8;

/// Row-major board grid as reported by the backend.
pub type Board = Vec<Vec<Cell>>;

/// Returns `(width, height)` of a board.
pub fn board_dimensions(board: &Board) -> (u32, u32) {
    let height = board.len() as u32;
    let width = board.first().map(|row| row.len() as u32).unwrap_or(0);
    (width, height)
}

/// The seven tetromino kinds, in backend color order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Map a backend color index (1-7) to a piece kind.
    pub fn from_color(color: Cell) -> Option<Self> {
        match color {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    pub fn color(&self) -> Cell {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Single-letter label used by the text view.
    pub fn as_char(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }
}

/// A piece as reported by the backend.
///
/// `position` is the top-left `(row, col)` of `shape` on the board and is
/// only present for the falling piece. Preview pieces (next, held) carry
/// neither position nor rotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub shape: Vec<Vec<Cell>>,
    pub color: Cell,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<(i32, i32)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<u8>,
}

impl Piece {
    pub fn kind(&self) -> Option<PieceKind> {
        PieceKind::from_color(self.color)
    }

    /// Board cells covered by this piece, as `(row, col)` pairs.
    ///
    /// Empty for pieces without a position.
    pub fn cells(&self) -> Vec<(i32, i32)> {
        let Some((row, col)) = self.position else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (dy, line) in self.shape.iter().enumerate() {
            for (dx, &v) in line.iter().enumerate() {
                if v != 0 {
                    out.push((row + dy as i32, col + dx as i32));
                }
            }
        }
        out
    }
}

/// Lifecycle status of a game on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Paused,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "game_over",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::GameOver)
    }
}

/// A discrete player intent, sent to the backend as `move_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    /// Shift the falling piece one column left
    Left,
    /// Shift the falling piece one column right
    Right,
    /// Move the falling piece one row down (also the drop tick)
    Down,
    /// Rotate the falling piece
    Rotate,
    /// Drop the falling piece to the floor and lock it
    HardDrop,
    /// Store the falling piece, or pop the stored one into play
    Hold,
}

impl MoveType {
    /// Parse a wire name.
    ///
    /// ```
    /// use tetris_client_types::MoveType;
    ///
    /// assert_eq!(MoveType::from_str("left"), Some(MoveType::Left));
    /// assert_eq!(MoveType::from_str("ROTATE"), Some(MoveType::Rotate));
    /// assert_eq!(MoveType::from_str("spin"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(MoveType::Left),
            "right" => Some(MoveType::Right),
            "down" => Some(MoveType::Down),
            "rotate" => Some(MoveType::Rotate),
            "hard_drop" => Some(MoveType::HardDrop),
            "hold" => Some(MoveType::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveType::Left => "left",
            MoveType::Right => "right",
            MoveType::Down => "down",
            MoveType::Rotate => "rotate",
            MoveType::HardDrop => "hard_drop",
            MoveType::Hold => "hold",
        }
    }
}

impl std::fmt::Display for MoveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The game the client is currently attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSession {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub level: u32,
}

impl From<&CreateGameResponse> for GameSession {
    fn from(value: &CreateGameResponse) -> Self {
        Self {
            id: value.game_id,
            width: value.width,
            height: value.height,
            level: value.level,
        }
    }
}

/// Display-ready state of a game at one point in time.
///
/// Unlike the wire payloads, `held_piece` and `can_hold` are always
/// resolved here: a missing value from the backend has already been
/// replaced by whatever the client knew before.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameStateSnapshot {
    pub board: Board,
    pub current_piece: Option<Piece>,
    pub next_piece: Option<Piece>,
    pub held_piece: Option<Piece>,
    pub score: u64,
    pub level: u32,
    pub lines_cleared: u32,
    pub can_hold: bool,
    pub status: GameStatus,
}

impl GameStateSnapshot {
    pub fn is_ongoing(&self) -> bool {
        self.status == GameStatus::Ongoing
    }

    pub fn dimensions(&self) -> (u32, u32) {
        board_dimensions(&self.board)
    }

    /// Board with the falling piece stamped in, for display.
    pub fn composed_board(&self) -> Board {
        let mut board = self.board.clone();
        if let Some(piece) = &self.current_piece {
            for (row, col) in piece.cells() {
                if row < 0 || col < 0 {
                    continue;
                }
                if let Some(cell) = board
                    .get_mut(row as usize)
                    .and_then(|line| line.get_mut(col as usize))
                {
                    *cell = piece.color;
                }
            }
        }
        board
    }
}
