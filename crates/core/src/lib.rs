//! Game control core: session lifecycle, move dispatch and reconciliation.
//!
//! The backend is authoritative for every rule. This crate decides *when*
//! to ask it something and how to fold its answers into the one snapshot
//! everything else reads.
//!
//! # Module Structure
//!
//! - [`controller`]: [`GameController`], the owner of the current game
//! - [`plan`]: guards and hold flags for an outgoing move
//! - [`reconcile`]: merging status and move payloads into the snapshot
//! - [`state`]: [`ControllerState`], the published state value
//! - [`error`]: [`SessionError`], [`MoveError`] and [`Precondition`]
//!
//! # Hold Rule
//!
//! The hold slot holds one piece and is emptied on use:
//!
//! - empty slot: `hold` stores the falling piece
//! - stored piece: `hold` pops it into play (`clear_hold` + `skip_store`)
//!   and the slot becomes empty
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use tetris_client_api::scripted::{fixtures, ScriptedBackend};
//! use tetris_client_core::{GameController, MoveOutcome};
//! use tetris_client_types::{CreateGameRequest, GameStatus, MoveType};
//!
//! # tokio_test::block_on(async {
//! let backend = Arc::new(ScriptedBackend::new());
//! backend.push_create(Ok(fixtures::created(1, 1)));
//! backend.set_status(fixtures::status(GameStatus::Ongoing, 1));
//! backend.set_move(fixtures::move_from(&fixtures::status(GameStatus::Ongoing, 1)));
//!
//! let controller = GameController::new(Arc::clone(&backend));
//! controller.create_game(CreateGameRequest { level: 1, ..Default::default() }).await.unwrap();
//!
//! // Same board as before: nothing to publish.
//! let outcome = controller.dispatch(MoveType::Down).await.unwrap();
//! assert_eq!(outcome, MoveOutcome::Unchanged);
//! # });
//! ```

pub mod controller;
pub mod error;
pub mod plan;
pub mod reconcile;
pub mod state;

pub use tetris_client_api as api;
pub use tetris_client_types as types;

pub use controller::{GameController, MoveOutcome};
pub use error::{MoveError, Precondition, ReconcileError, SessionError};
pub use plan::plan_move;
pub use state::ControllerState;
