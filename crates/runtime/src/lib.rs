//! Async runtime pieces around [`GameController`].
//!
//! - [`scheduler`]: the gravity timer that sends `down` every drop period
//! - [`router`]: turns key presses into moves while a game is active
//! - [`session`]: opening the first game without ending the client on failure
//! - [`config`]: environment and command line settings
//! - [`telemetry`]: logging setup
//!
//! [`GameController`]: crate::core::GameController

pub mod config;
pub mod router;
pub mod scheduler;
pub mod session;
pub mod telemetry;

pub use tetris_client_api as api;
pub use tetris_client_core as core;
pub use tetris_client_input as input;
pub use tetris_client_types as types;

pub use config::ClientConfig;
pub use router::InputRouter;
pub use scheduler::{drop_period, DropScheduler};
pub use session::{open_game, start_game};
