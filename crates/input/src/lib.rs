//! Keyboard mapping for the Tetris client.
//!
//! Independent of any backend or runtime: it only turns `crossterm` key
//! events into [`RoutedInput`] values for the input router and
//! [`ShellCommand`] values for the surrounding terminal shell.

pub mod map;

pub use tetris_client_types as types;

pub use map::{is_key_down, route_key, shell_command, should_quit, RoutedInput, ShellCommand};
