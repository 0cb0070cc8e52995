//! In-memory backend that replays queued responses.
//!
//! Each endpoint has its own queue. The last queued response for an
//! endpoint is sticky: it keeps being returned until something else is
//! pushed, which suits timer-driven callers that hit the same endpoint
//! many times. An endpoint with nothing queued fails with
//! [`ApiError::Transport`].

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::types::{
    CreateGameRequest, CreateGameResponse, ForfeitResponse, MoveRequest, MoveResponse,
    PauseResponse, StatusResponse,
};
use crate::{ApiError, Backend};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Create(CreateGameRequest),
    Status(u64),
    Move(u64, MoveRequest),
    Pause(u64, bool),
    Forfeit(u64),
}

#[derive(Debug)]
struct Queue<T> {
    items: VecDeque<Result<T, ApiError>>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T: Clone> Queue<T> {
    fn next(&mut self, endpoint: &str) -> Result<T, ApiError> {
        if self.items.len() > 1 {
            if let Some(item) = self.items.pop_front() {
                return item;
            }
        }
        self.items
            .front()
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Transport(format!("no scripted {endpoint} response"))))
    }
}

#[derive(Debug, Default)]
struct Script {
    calls: Vec<BackendCall>,
    create: Queue<CreateGameResponse>,
    status: Queue<StatusResponse>,
    moves: Queue<MoveResponse>,
    pause: Queue<PauseResponse>,
    forfeit: Queue<ForfeitResponse>,
}

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
    move_delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every move call sleeps this long before answering.
    pub fn with_move_delay(mut self, delay: Duration) -> Self {
        self.move_delay = Some(delay);
        self
    }

    fn with_script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut guard = match self.script.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    pub fn push_create(&self, response: Result<CreateGameResponse, ApiError>) {
        self.with_script(|s| s.create.items.push_back(response));
    }

    pub fn push_status(&self, response: Result<StatusResponse, ApiError>) {
        self.with_script(|s| s.status.items.push_back(response));
    }

    pub fn push_move(&self, response: Result<MoveResponse, ApiError>) {
        self.with_script(|s| s.moves.items.push_back(response));
    }

    pub fn push_pause(&self, response: Result<PauseResponse, ApiError>) {
        self.with_script(|s| s.pause.items.push_back(response));
    }

    pub fn push_forfeit(&self, response: Result<ForfeitResponse, ApiError>) {
        self.with_script(|s| s.forfeit.items.push_back(response));
    }

    /// Replace whatever is queued for status with a single sticky response.
    pub fn set_status(&self, response: StatusResponse) {
        self.with_script(|s| {
            s.status.items.clear();
            s.status.items.push_back(Ok(response));
        });
    }

    /// Replace whatever is queued for moves with a single sticky response.
    pub fn set_move(&self, response: MoveResponse) {
        self.with_script(|s| {
            s.moves.items.clear();
            s.moves.items.push_back(Ok(response));
        });
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.with_script(|s| s.calls.clone())
    }

    pub fn move_calls(&self) -> Vec<MoveRequest> {
        self.with_script(|s| {
            s.calls
                .iter()
                .filter_map(|c| match c {
                    BackendCall::Move(_, req) => Some(*req),
                    _ => None,
                })
                .collect()
        })
    }

    pub fn status_calls(&self) -> usize {
        self.with_script(|s| {
            s.calls
                .iter()
                .filter(|c| matches!(c, BackendCall::Status(_)))
                .count()
        })
    }

    pub fn clear_calls(&self) {
        self.with_script(|s| s.calls.clear());
    }
}

impl Backend for ScriptedBackend {
    async fn create_game(
        &self,
        request: &CreateGameRequest,
    ) -> Result<CreateGameResponse, ApiError> {
        self.with_script(|s| {
            s.calls.push(BackendCall::Create(request.clone()));
            s.create.next("create")
        })
    }

    async fn game_status(&self, game_id: u64) -> Result<StatusResponse, ApiError> {
        self.with_script(|s| {
            s.calls.push(BackendCall::Status(game_id));
            s.status.next("status")
        })
    }

    async fn make_move(
        &self,
        game_id: u64,
        request: &MoveRequest,
    ) -> Result<MoveResponse, ApiError> {
        let request = *request;
        self.with_script(|s| s.calls.push(BackendCall::Move(game_id, request)));
        if let Some(delay) = self.move_delay {
            tokio::time::sleep(delay).await;
        }
        self.with_script(|s| s.moves.next("move"))
    }

    async fn pause(&self, game_id: u64, paused: bool) -> Result<PauseResponse, ApiError> {
        self.with_script(|s| {
            s.calls.push(BackendCall::Pause(game_id, paused));
            s.pause.next("pause")
        })
    }

    async fn forfeit(&self, game_id: u64) -> Result<ForfeitResponse, ApiError> {
        self.with_script(|s| {
            s.calls.push(BackendCall::Forfeit(game_id));
            s.forfeit.next("forfeit")
        })
    }
}

/// Canned payloads for tests.
pub mod fixtures {
    use crate::types::{
        Board, CreateGameResponse, GameStatus, MoveResponse, PauseResponse, Piece, StatusResponse,
    };

    pub fn empty_board(width: usize, height: usize) -> Board {
        vec![vec![0; width]; height]
    }

    /// A preview piece (no position).
    pub fn piece(color: u8) -> Piece {
        Piece {
            shape: vec![vec![color, color], vec![color, color]],
            color,
            position: None,
            rotation: None,
        }
    }

    /// A falling piece at `(row, col)`.
    pub fn falling(color: u8, row: i32, col: i32) -> Piece {
        Piece {
            position: Some((row, col)),
            rotation: Some(0),
            ..piece(color)
        }
    }

    pub fn created(game_id: u64, level: u32) -> CreateGameResponse {
        CreateGameResponse {
            game_id,
            width: 10,
            height: 20,
            level,
        }
    }

    /// A fresh 10x20 game with nothing held.
    pub fn status(status: GameStatus, level: u32) -> StatusResponse {
        StatusResponse {
            board: empty_board(10, 20),
            current_piece: match status {
                GameStatus::Ongoing => Some(falling(6, 0, 4)),
                _ => None,
            },
            next_piece: Some(piece(1)),
            held_piece: None,
            score: 0,
            level,
            lines_cleared: 0,
            can_hold: Some(true),
            status,
        }
    }

    /// Move response mirroring a status payload.
    pub fn move_from(status: &StatusResponse) -> MoveResponse {
        MoveResponse {
            board: status.board.clone(),
            current_piece: status.current_piece.clone(),
            next_piece: status.next_piece.clone(),
            held_piece: status.held_piece.clone(),
            score: status.score,
            level: status.level,
            lines_cleared: status.lines_cleared,
            can_hold: status.can_hold,
            status: status.status,
        }
    }

    pub fn paused(game_id: u64, paused: bool) -> PauseResponse {
        PauseResponse {
            game_id,
            status: if paused {
                GameStatus::Paused
            } else {
                GameStatus::Ongoing
            },
        }
    }
}
