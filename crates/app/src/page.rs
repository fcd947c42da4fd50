//! Page layout: heading, board, status line.

use std::io::{self, Write};

use crate::widget::Chessboard;

pub const TITLE: &str = "Rusty Chess";

pub const HELP: &str = "Drag a piece by typing its squares (e2e4, e2 e4, e2-e4). \
Other commands: refresh, help, quit.";

pub struct Page<W: Write> {
    out: W,
}

impl<W: Write> Page<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn draw(&mut self, board: &Chessboard, position: &str, pending: bool) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{TITLE}")?;
        writeln!(self.out, "{}", "=".repeat(TITLE.len()))?;
        write!(self.out, "{}", board.render())?;
        writeln!(self.out, "{}", status_line(position, pending))?;
        self.out.flush()
    }

    /// Blocking notification. Printed on its own line so it is not lost in
    /// the redraw that follows.
    pub fn alert(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "!! {message}")?;
        self.out.flush()
    }

    pub fn note(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn status_line(position: &str, pending: bool) -> String {
    if pending {
        return "waiting for server...".to_string();
    }

    // Side to move is the second FEN field; "start" means white.
    match position.split_whitespace().nth(1) {
        Some("b") => "Black to move.".to_string(),
        Some("w") | None => "White to move.".to_string(),
        Some(_) => format!("Position: {position}"),
    }
}
