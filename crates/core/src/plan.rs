//! Deciding whether and how a move is sent.

use crate::error::Precondition;
use crate::state::ControllerState;
use crate::types::{GameStatus, MoveRequest, MoveType};

/// Turn a move into the request to send, or the reason not to send one.
///
/// For `hold`, the request shape depends on the hold slot as it is right
/// now: a stored piece is popped into play (`clear_hold` + `skip_store`),
/// an empty slot receives the current piece (no flags).
pub fn plan_move(
    state: &ControllerState,
    move_type: MoveType,
) -> Result<MoveRequest, Precondition> {
    if state.session.is_none() {
        return Err(Precondition::NoSession);
    }
    let Some(snapshot) = state.snapshot.as_deref() else {
        return Err(Precondition::NoSnapshot);
    };
    if snapshot.status != GameStatus::Ongoing {
        return Err(Precondition::NotOngoing(snapshot.status));
    }
    if state.paused {
        return Err(Precondition::Paused);
    }

    if move_type != MoveType::Hold {
        return Ok(MoveRequest::new(move_type));
    }
    if !snapshot.can_hold {
        return Err(Precondition::HoldUnavailable);
    }
    if snapshot.held_piece.is_some() {
        Ok(MoveRequest::hold_pop())
    } else {
        Ok(MoveRequest::new(MoveType::Hold))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::scripted::fixtures::{piece, status};
    use crate::reconcile::from_status;
    use crate::types::GameSession;

    fn state(status_value: GameStatus) -> ControllerState {
        ControllerState {
            session: Some(GameSession {
                id: 9,
                width: 10,
                height: 20,
                level: 1,
            }),
            snapshot: Some(Arc::new(from_status(status(status_value, 1), None))),
            paused: status_value == GameStatus::Paused,
            error: None,
            epoch: 1,
            unscored: false,
        }
    }

    #[test]
    fn directional_moves_carry_no_flags() {
        let s = state(GameStatus::Ongoing);
        for m in [
            MoveType::Left,
            MoveType::Right,
            MoveType::Down,
            MoveType::Rotate,
            MoveType::HardDrop,
        ] {
            assert_eq!(plan_move(&s, m), Ok(MoveRequest::new(m)));
        }
    }

    #[test]
    fn hold_with_empty_slot_stores() {
        let s = state(GameStatus::Ongoing);
        let req = plan_move(&s, MoveType::Hold).unwrap();
        assert!(!req.clear_hold);
        assert!(!req.skip_store);
    }

    #[test]
    fn hold_with_stored_piece_pops() {
        let mut s = state(GameStatus::Ongoing);
        let mut snap = (*s.snapshot.clone().unwrap()).clone();
        snap.held_piece = Some(piece(2));
        s.snapshot = Some(Arc::new(snap));

        let req = plan_move(&s, MoveType::Hold).unwrap();
        assert!(req.clear_hold);
        assert!(req.skip_store);
    }

    #[test]
    fn hold_requires_can_hold() {
        let mut s = state(GameStatus::Ongoing);
        let mut snap = (*s.snapshot.clone().unwrap()).clone();
        snap.can_hold = false;
        s.snapshot = Some(Arc::new(snap));

        assert_eq!(plan_move(&s, MoveType::Hold), Err(Precondition::HoldUnavailable));
        assert!(plan_move(&s, MoveType::Left).is_ok());
    }

    #[test]
    fn guards_block_inactive_games() {
        assert_eq!(
            plan_move(&ControllerState::default(), MoveType::Down),
            Err(Precondition::NoSession)
        );

        let mut no_snapshot = state(GameStatus::Ongoing);
        no_snapshot.snapshot = None;
        assert_eq!(plan_move(&no_snapshot, MoveType::Down), Err(Precondition::NoSnapshot));

        assert_eq!(
            plan_move(&state(GameStatus::Paused), MoveType::Down),
            Err(Precondition::NotOngoing(GameStatus::Paused))
        );
        assert_eq!(
            plan_move(&state(GameStatus::GameOver), MoveType::Down),
            Err(Precondition::NotOngoing(GameStatus::GameOver))
        );

        let mut paused_locally = state(GameStatus::Ongoing);
        paused_locally.paused = true;
        assert_eq!(plan_move(&paused_locally, MoveType::Rotate), Err(Precondition::Paused));
    }
}
