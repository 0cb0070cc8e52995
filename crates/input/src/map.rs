//! Key mapping from terminal events to game intents.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::MoveType;

/// What a key press asks of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutedInput {
    Move(MoveType),
    /// Goes straight to the session, not through the move dispatcher.
    TogglePause,
}

/// Keys handled by the shell regardless of game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Quit,
    /// Pause button: works while paused, unlike the routed `p` key.
    TogglePause,
    Forfeit,
    NewGame,
    DismissError,
}

/// Key-down events, including terminal auto-repeat.
///
/// Repeats are not de-bounced: holding an arrow keeps moving the piece.
pub fn is_key_down(key: &KeyEvent) -> bool {
    matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
}

/// Map a key to a game intent.
pub fn route_key(key: KeyEvent) -> Option<RoutedInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Left => Some(RoutedInput::Move(MoveType::Left)),
        KeyCode::Right => Some(RoutedInput::Move(MoveType::Right)),
        KeyCode::Down => Some(RoutedInput::Move(MoveType::Down)),
        KeyCode::Up => Some(RoutedInput::Move(MoveType::Rotate)),
        KeyCode::Char(' ') => Some(RoutedInput::Move(MoveType::HardDrop)),
        KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(RoutedInput::Move(MoveType::Hold))
        }
        KeyCode::Char('p') | KeyCode::Char('P') => Some(RoutedInput::TogglePause),
        _ => None,
    }
}

/// Map a key to a shell command.
pub fn shell_command(key: KeyEvent) -> Option<ShellCommand> {
    if should_quit(key) {
        return Some(ShellCommand::Quit);
    }
    match key.code {
        KeyCode::Char('p') | KeyCode::Char('P') => Some(ShellCommand::TogglePause),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(ShellCommand::Forfeit),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(ShellCommand::NewGame),
        KeyCode::Esc => Some(ShellCommand::DismissError),
        _ => None,
    }
}

/// Check if key should quit the client.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
