//! Terminal client for a REST-backed Tetris service (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this
//! package re-exports them as `tetris_client::{api,core,input,runtime,types}`.

pub use tetris_client_api as api;
pub use tetris_client_core as core;
pub use tetris_client_input as input;
pub use tetris_client_runtime as runtime;
pub use tetris_client_types as types;
