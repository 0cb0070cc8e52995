//! Backend access for the Tetris client.
//!
//! The game rules live on the server. This crate only knows how to reach it:
//!
//! - [`Backend`]: the five calls the controller needs (create, status, move,
//!   pause, forfeit)
//! - [`HttpBackend`]: the reqwest implementation speaking JSON over HTTP
//! - `ScriptedBackend`: an in-memory implementation that replays canned
//!   responses and records every call (tests only, behind the `testing`
//!   feature)
//!
//! # Environment Variables
//!
//! - `TETRIS_API_URL`: Base URL (default: "http://localhost:8000")
//! - `TETRIS_API_TOKEN`: Bearer token; unset means anonymous play
//! - `TETRIS_API_TIMEOUT_MS`: Per-request timeout (default: 10000)
//!
//! Anonymous play is allowed by the backend, but scores are not saved. A
//! 401 is reported as [`ApiError::Status`] with `status == 401` so callers
//! can tell it apart from real failures.

use std::future::Future;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;

pub use tetris_client_types as types;

pub use config::ApiConfig;
pub use error::ApiError;
pub use http::HttpBackend;
#[cfg(any(test, feature = "testing"))]
pub use scripted::{BackendCall, ScriptedBackend};

use crate::types::{
    CreateGameRequest, CreateGameResponse, ForfeitResponse, MoveRequest, MoveResponse,
    PauseResponse, StatusResponse,
};

/// The REST contract consumed by the controller.
///
/// Every call is a single request; implementations never retry.
pub trait Backend: Send + Sync + 'static {
    /// `POST /tetris`
    fn create_game(
        &self,
        request: &CreateGameRequest,
    ) -> impl Future<Output = Result<CreateGameResponse, ApiError>> + Send;

    /// `GET /tetris/{id}`
    fn game_status(
        &self,
        game_id: u64,
    ) -> impl Future<Output = Result<StatusResponse, ApiError>> + Send;

    /// `POST /tetris/{id}/moves`
    fn make_move(
        &self,
        game_id: u64,
        request: &MoveRequest,
    ) -> impl Future<Output = Result<MoveResponse, ApiError>> + Send;

    /// `POST /tetris/{id}/pause`
    fn pause(
        &self,
        game_id: u64,
        paused: bool,
    ) -> impl Future<Output = Result<PauseResponse, ApiError>> + Send;

    /// `DELETE /tetris/{id}`
    fn forfeit(
        &self,
        game_id: u64,
    ) -> impl Future<Output = Result<ForfeitResponse, ApiError>> + Send;
}

impl<B: Backend> Backend for Arc<B> {
    fn create_game(
        &self,
        request: &CreateGameRequest,
    ) -> impl Future<Output = Result<CreateGameResponse, ApiError>> + Send {
        (**self).create_game(request)
    }

    fn game_status(
        &self,
        game_id: u64,
    ) -> impl Future<Output = Result<StatusResponse, ApiError>> + Send {
        (**self).game_status(game_id)
    }

    fn make_move(
        &self,
        game_id: u64,
        request: &MoveRequest,
    ) -> impl Future<Output = Result<MoveResponse, ApiError>> + Send {
        (**self).make_move(game_id, request)
    }

    fn pause(
        &self,
        game_id: u64,
        paused: bool,
    ) -> impl Future<Output = Result<PauseResponse, ApiError>> + Send {
        (**self).pause(game_id, paused)
    }

    fn forfeit(
        &self,
        game_id: u64,
    ) -> impl Future<Output = Result<ForfeitResponse, ApiError>> + Send {
        (**self).forfeit(game_id)
    }
}
