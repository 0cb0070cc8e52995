//! Plain text view of the controller state.
//!
//! One full frame per published change. Frames are built as lines first so
//! the layout can be checked without a terminal.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{cursor, style::Print, terminal, QueueableCommand};

use tetris_client::core::ControllerState;
use tetris_client::types::{Cell, Piece, PieceKind};

pub const HELP: &str =
    "arrows move  up rotate  space drop  c hold  p pause  f forfeit  n new  esc dismiss  q quit";

pub const UNSCORED: &str = "playing anonymously: scores will not be saved";

pub struct Screen {
    stdout: io::Stdout,
    buf: Vec<u8>,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(4 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn draw(&mut self, lines: &[String]) -> Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        for (y, line) in lines.iter().enumerate() {
            self.buf.queue(cursor::MoveTo(0, y as u16))?;
            self.buf.queue(Print(line))?;
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn cell_char(cell: Cell) -> char {
    if cell == 0 {
        return '.';
    }
    PieceKind::from_color(cell).map_or('#', |k| k.as_char())
}

fn piece_label(piece: Option<&Piece>) -> char {
    piece.and_then(Piece::kind).map_or('-', |k| k.as_char())
}

pub fn frame_lines(state: &ControllerState) -> Vec<String> {
    let mut lines = Vec::new();

    let Some(snapshot) = state.snapshot.as_deref() else {
        lines.push("tetris".to_string());
        lines.push(String::new());
        lines.push("no game  (n: new game, q: quit)".to_string());
        if state.unscored {
            lines.push(UNSCORED.to_string());
        }
        if let Some(error) = &state.error {
            lines.push(format!("error: {error}"));
        }
        return lines;
    };

    let game = state.session_id().map_or_else(|| "-".to_string(), |id| id.to_string());
    lines.push(format!(
        "tetris  game {game}  level {}  score {}  lines {}",
        snapshot.level, snapshot.score, snapshot.lines_cleared
    ));

    let board = snapshot.composed_board();
    let width = board.first().map_or(0, Vec::len);
    let border = format!("+{}+", "-".repeat(width));
    let side = [
        format!("next {}", piece_label(snapshot.next_piece.as_ref())),
        format!(
            "hold {}{}",
            piece_label(snapshot.held_piece.as_ref()),
            if snapshot.can_hold { "" } else { " (used)" }
        ),
    ];

    lines.push(border.clone());
    for (y, row) in board.iter().enumerate() {
        let cells: String = row.iter().copied().map(cell_char).collect();
        match side.get(y) {
            Some(extra) => lines.push(format!("|{cells}|  {extra}")),
            None => lines.push(format!("|{cells}|")),
        }
    }
    lines.push(border);

    let status = if state.paused {
        "paused  (p: resume)"
    } else if state.is_game_over() {
        "game over  (n: new game)"
    } else {
        snapshot.status.as_str()
    };
    lines.push(format!("status: {status}"));
    if state.unscored {
        lines.push(UNSCORED.to_string());
    }
    if let Some(error) = &state.error {
        lines.push(format!("error: {error}  (esc to dismiss)"));
    }
    lines.push(HELP.to_string());
    lines
}
