//! Merging backend payloads into the local snapshot.
//!
//! The backend reports `held_piece: null` both when the hold slot is empty
//! and when it simply did not say. The client keeps what it already knew
//! unless it has a reason to believe the slot was emptied, which is only
//! the case right after a hold that popped the stored piece.

use crate::error::ReconcileError;
use crate::types::{
    board_dimensions, Board, GameSession, GameStateSnapshot, MoveRequest, MoveResponse,
    StatusResponse,
};

/// Reject boards whose shape differs from the session's.
pub fn check_board(session: &GameSession, board: &Board) -> Result<(), ReconcileError> {
    let (actual_width, actual_height) = board_dimensions(board);
    let ragged = board.iter().any(|row| row.len() as u32 != actual_width);
    if ragged || actual_width != session.width || actual_height != session.height {
        return Err(ReconcileError::BoardShape {
            width: session.width,
            height: session.height,
            actual_width,
            actual_height,
        });
    }
    Ok(())
}

/// Build a snapshot from a full status fetch.
///
/// `held_piece` and `can_hold` fall back to `prior` when the payload omits
/// them. With no prior, an omitted `can_hold` means a hold is allowed.
pub fn from_status(status: StatusResponse, prior: Option<&GameStateSnapshot>) -> GameStateSnapshot {
    let held_piece = match status.held_piece {
        Some(piece) => Some(piece),
        None => prior.and_then(|p| p.held_piece.clone()),
    };
    let can_hold = status
        .can_hold
        .or_else(|| prior.map(|p| p.can_hold))
        .unwrap_or(true);

    GameStateSnapshot {
        board: status.board,
        current_piece: status.current_piece,
        next_piece: status.next_piece,
        held_piece,
        score: status.score,
        level: status.level,
        lines_cleared: status.lines_cleared,
        can_hold,
        status: status.status,
    }
}

/// Patch `current` with a same-status move response.
///
/// Only meaningful when `response.status` is still ongoing; terminal
/// responses are handled by a full refetch instead. `status` itself is not
/// patched.
pub fn apply_move(
    current: &GameStateSnapshot,
    response: &MoveResponse,
    request: &MoveRequest,
) -> GameStateSnapshot {
    let held_piece = if request.is_hold_pop() && current.held_piece.is_some() {
        None
    } else {
        response
            .held_piece
            .clone()
            .or_else(|| current.held_piece.clone())
    };

    GameStateSnapshot {
        board: response.board.clone(),
        current_piece: response.current_piece.clone(),
        next_piece: response.next_piece.clone(),
        held_piece,
        score: response.score,
        level: response.level,
        lines_cleared: response.lines_cleared,
        can_hold: response.can_hold.unwrap_or(current.can_hold),
        status: current.status,
    }
}

/// True when `candidate` would not change anything the board view shows.
///
/// Compares board, falling piece, score, level and line count only.
pub fn is_redundant(current: &GameStateSnapshot, candidate: &GameStateSnapshot) -> bool {
    current.board == candidate.board
        && current.current_piece == candidate.current_piece
        && current.score == candidate.score
        && current.level == candidate.level
        && current.lines_cleared == candidate.lines_cleared
}
