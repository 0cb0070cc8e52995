//! Session lifecycle and move dispatch against a [`Backend`].

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, trace, warn};

use crate::api::Backend;
use crate::error::{MoveError, Precondition, ReconcileError, SessionError};
use crate::plan::plan_move;
use crate::reconcile::{self, check_board};
use crate::state::ControllerState;
use crate::types::{
    board_dimensions, CreateGameRequest, GameSession, GameStateSnapshot, GameStatus, MoveType,
    StatusResponse, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH,
};

/// What happened to a dispatched move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not sent; no network call was made.
    Skipped(Precondition),
    /// The snapshot was patched from the move response.
    Patched,
    /// The response matched the current snapshot; nothing was published.
    Unchanged,
    /// The move changed the game status; the snapshot was refetched.
    Refreshed,
    /// The session changed while the request was in flight.
    Discarded,
}

/// Owner of the current game.
///
/// All state lives in one [`ControllerState`] published through a watch
/// channel. Methods take `&self` so the drop timer, the input router and
/// the shell can share one controller behind an `Arc`. At most one move is
/// in flight at a time; a move requested meanwhile is skipped.
pub struct GameController<B> {
    backend: B,
    state: watch::Sender<ControllerState>,
    flight: Mutex<()>,
}

impl<B: Backend> GameController<B> {
    pub fn new(backend: B) -> Self {
        let (state, _) = watch::channel(ControllerState::default());
        Self {
            backend,
            state,
            flight: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Receiver woken on every published change.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    pub fn state(&self) -> ControllerState {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Arc<GameStateSnapshot>> {
        self.state.borrow().snapshot.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().is_active()
    }

    pub fn is_move_in_flight(&self) -> bool {
        self.flight.try_lock().is_err()
    }

    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Mark the game as played without credentials. Survives `reset`.
    pub fn set_unscored(&self, unscored: bool) {
        self.state.send_if_modified(|s| {
            if s.unscored == unscored {
                return false;
            }
            s.unscored = unscored;
            true
        });
    }

    fn clear_error(&self) {
        self.dismiss_error();
    }

    fn fail<E: std::fmt::Display>(&self, err: E) -> E {
        let message = err.to_string();
        warn!(error = %message, "game operation failed");
        self.state.send_if_modified(|s| {
            if s.error.as_deref() == Some(message.as_str()) {
                return false;
            }
            s.error = Some(message);
            true
        });
        err
    }

    /// Start a new game and load its initial state.
    ///
    /// A 401 from the backend is reported as [`SessionError::AuthRequired`].
    pub async fn create_game(
        &self,
        request: CreateGameRequest,
    ) -> Result<GameSession, SessionError> {
        self.clear_error();

        let created = match self.backend.create_game(&request).await {
            Ok(created) => created,
            Err(e) if e.is_unauthorized() => return Err(self.fail(SessionError::AuthRequired(e))),
            Err(e) => return Err(self.fail(SessionError::Create(e))),
        };
        let session = GameSession::from(&created);

        let mut epoch = 0;
        self.state.send_modify(|s| {
            s.session = Some(session);
            s.snapshot = None;
            s.paused = false;
            s.epoch += 1;
            epoch = s.epoch;
        });
        info!(game_id = session.id, level = session.level, "game created");

        let status = self
            .backend
            .game_status(session.id)
            .await
            .map_err(|e| self.fail(SessionError::Fetch(e)))?;
        check_board(&session, &status.board).map_err(|e| self.fail(SessionError::from(e)))?;

        let snapshot = reconcile::from_status(status, None);
        self.state.send_if_modified(|s| {
            if s.epoch != epoch {
                return false;
            }
            s.snapshot = Some(Arc::new(snapshot));
            true
        });
        Ok(session)
    }

    /// Fetch the full state of `game_id`, or of the current game.
    ///
    /// Fetching a different game adopts it as the current one. Returns
    /// `None` when the session changed before the response arrived.
    pub async fn get_status(
        &self,
        game_id: Option<u64>,
    ) -> Result<Option<Arc<GameStateSnapshot>>, SessionError> {
        let (current, epoch) = {
            let s = self.state.borrow();
            (s.session_id(), s.epoch)
        };
        let Some(id) = game_id.or(current) else {
            return Err(self.fail(SessionError::NoSession));
        };

        self.clear_error();
        let status = self
            .backend
            .game_status(id)
            .await
            .map_err(|e| self.fail(SessionError::Fetch(e)))?;

        let applied = self
            .apply_status(id, epoch, status)
            .map_err(|e| self.fail(SessionError::from(e)))?;
        if !applied {
            return Ok(None);
        }
        Ok(self.snapshot())
    }

    /// Replace the snapshot with a full status payload.
    ///
    /// Returns `false` if the payload is stale.
    fn apply_status(
        &self,
        id: u64,
        epoch: u64,
        status: StatusResponse,
    ) -> Result<bool, ReconcileError> {
        let mut result = Ok(true);
        self.state.send_if_modified(|s| {
            if s.epoch != epoch {
                result = Ok(false);
                return false;
            }

            let adopting = s.session_id() != Some(id);
            let session = if adopting {
                let (width, height) = match board_dimensions(&status.board) {
                    (0, _) | (_, 0) => (DEFAULT_BOARD_WIDTH, DEFAULT_BOARD_HEIGHT),
                    dims => dims,
                };
                GameSession {
                    id,
                    width,
                    height,
                    level: status.level,
                }
            } else {
                match s.session {
                    Some(session) => session,
                    None => return false,
                }
            };
            if let Err(e) = check_board(&session, &status.board) {
                result = Err(e);
                return false;
            }

            let prior = if adopting { None } else { s.snapshot.as_deref() };
            let next = reconcile::from_status(status, prior);
            let paused = next.status == GameStatus::Paused;

            if adopting {
                info!(game_id = id, "adopted game");
                s.session = Some(session);
                s.epoch += 1;
            } else if s.snapshot.as_deref() == Some(&next) && s.paused == paused {
                return false;
            }
            s.paused = paused;
            s.snapshot = Some(Arc::new(next));
            true
        });
        result
    }

    /// Pause a running game or resume a paused one.
    ///
    /// Does nothing without a game or once it is over. The local pause bit
    /// only changes after the backend confirms.
    pub async fn toggle_pause(&self) -> Result<(), SessionError> {
        let target = {
            let s = self.state.borrow();
            match (s.session, s.status()) {
                (Some(session), Some(status)) if !status.is_terminal() => {
                    Some((session.id, !s.paused, s.epoch))
                }
                _ => None,
            }
        };
        let Some((id, paused, epoch)) = target else {
            return Ok(());
        };

        self.clear_error();
        let response = self
            .backend
            .pause(id, paused)
            .await
            .map_err(|e| self.fail(SessionError::Pause(e)))?;

        let confirmed = response.status == GameStatus::Paused;
        self.state.send_if_modified(|s| {
            if s.epoch != epoch || s.paused == confirmed {
                return false;
            }
            s.paused = confirmed;
            true
        });
        info!(game_id = id, paused = confirmed, "pause toggled");

        let status = self
            .backend
            .game_status(id)
            .await
            .map_err(|e| self.fail(SessionError::Fetch(e)))?;
        self.apply_status(id, epoch, status)
            .map_err(|e| self.fail(SessionError::from(e)))?;
        Ok(())
    }

    /// End the current game on the backend.
    pub async fn forfeit(&self) -> Result<(), SessionError> {
        let current = {
            let s = self.state.borrow();
            s.session_id().map(|id| (id, s.epoch))
        };
        let Some((id, epoch)) = current else {
            return Err(self.fail(SessionError::NoSession));
        };

        self.clear_error();
        let response = self
            .backend
            .forfeit(id)
            .await
            .map_err(|e| self.fail(SessionError::Forfeit(e)))?;
        info!(game_id = id, score = ?response.score, "game forfeited");

        self.state.send_if_modified(|s| {
            if s.epoch != epoch || !s.paused {
                return false;
            }
            s.paused = false;
            true
        });

        let status = self
            .backend
            .game_status(id)
            .await
            .map_err(|e| self.fail(SessionError::Fetch(e)))?;
        self.apply_status(id, epoch, status)
            .map_err(|e| self.fail(SessionError::from(e)))?;
        Ok(())
    }

    /// Forget the current game. No backend call.
    pub fn reset(&self) {
        self.state.send_modify(|s| {
            s.session = None;
            s.snapshot = None;
            s.error = None;
            s.paused = false;
            s.epoch += 1;
        });
        debug!("game reset");
    }

    /// Send one move, subject to the guards in [`plan_move`].
    ///
    /// Skipped with [`Precondition::InFlight`] if another move has not
    /// resolved yet. Failures are recorded in the error slot and returned;
    /// the snapshot is left as it was.
    pub async fn dispatch(&self, move_type: MoveType) -> Result<MoveOutcome, MoveError> {
        let Ok(_flight) = self.flight.try_lock() else {
            trace!(%move_type, "move skipped: in flight");
            return Ok(MoveOutcome::Skipped(Precondition::InFlight));
        };
        self.send_move(move_type).await
    }

    /// Like [`dispatch`](Self::dispatch), but waits for a move in flight to
    /// resolve instead of skipping.
    ///
    /// Waiters are served in arrival order. The guards are evaluated after
    /// the wait, against the state the previous move left behind.
    pub async fn dispatch_waiting(&self, move_type: MoveType) -> Result<MoveOutcome, MoveError> {
        let _flight = self.flight.lock().await;
        self.send_move(move_type).await
    }

    /// Caller holds `flight`.
    async fn send_move(&self, move_type: MoveType) -> Result<MoveOutcome, MoveError> {
        let planned = {
            let s = self.state.borrow();
            match (plan_move(&s, move_type), s.session) {
                (Ok(request), Some(session)) => Ok((request, session, s.epoch)),
                (Ok(_), None) => Err(Precondition::NoSession),
                (Err(reason), _) => Err(reason),
            }
        };
        let (request, session, epoch) = match planned {
            Ok(planned) => planned,
            Err(reason) => {
                trace!(%move_type, %reason, "move skipped");
                return Ok(MoveOutcome::Skipped(reason));
            }
        };

        self.clear_error();
        debug!(
            game_id = session.id,
            %move_type,
            clear_hold = request.clear_hold,
            skip_store = request.skip_store,
            "dispatching move"
        );
        let response = self
            .backend
            .make_move(session.id, &request)
            .await
            .map_err(|e| self.fail(MoveError::Request(e)))?;

        if response.status != GameStatus::Ongoing {
            info!(
                game_id = session.id,
                status = response.status.as_str(),
                "move changed game status"
            );
            let status = self
                .backend
                .game_status(session.id)
                .await
                .map_err(|e| self.fail(MoveError::Refresh(e)))?;
            let applied = self
                .apply_status(session.id, epoch, status)
                .map_err(|e| self.fail(MoveError::from(e)))?;
            return Ok(if applied {
                MoveOutcome::Refreshed
            } else {
                MoveOutcome::Discarded
            });
        }

        check_board(&session, &response.board).map_err(|e| self.fail(MoveError::from(e)))?;

        let mut outcome = MoveOutcome::Discarded;
        self.state.send_if_modified(|s| {
            if s.epoch != epoch {
                return false;
            }
            let Some(current) = s.snapshot.as_deref() else {
                return false;
            };
            let candidate = reconcile::apply_move(current, &response, &request);
            if reconcile::is_redundant(current, &candidate) {
                outcome = MoveOutcome::Unchanged;
                return false;
            }
            s.snapshot = Some(Arc::new(candidate));
            outcome = MoveOutcome::Patched;
            true
        });
        Ok(outcome)
    }
}
