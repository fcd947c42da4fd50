//! Text chessboard widget.
//!
//! The widget is the only place that looks inside a FEN string, and only to
//! draw the piece placement. It never judges whether a position or a drag is
//! legal; that is the server's business.

use shakmaty::{Board, File, Piece, Rank, Square};

use chess_client::START_POSITION;

const FILES: &str = "abcdefgh";

#[derive(Debug, Clone)]
enum Picture {
    Board(Board),
    /// Placement we could not draw, kept verbatim for the placeholder.
    Unreadable(String),
}

#[derive(Debug, Clone)]
pub struct Chessboard {
    picture: Picture,
}

impl Chessboard {
    pub fn new() -> Self {
        Self {
            picture: Picture::Board(Board::new()),
        }
    }

    /// Redraw from a position string. Accepts `"start"` or any FEN.
    pub fn set_position(&mut self, fen: &str) {
        self.picture = picture_for(fen);
    }

    /// Move whatever stands on `source` to `target`. Purely visual.
    pub fn drag(&mut self, source: Square, target: Square) {
        if let Picture::Board(board) = &mut self.picture {
            if let Some(piece) = board.remove_piece_at(source) {
                board.set_piece_at(target, piece);
            }
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        match &self.picture {
            Picture::Board(board) => board.piece_at(square),
            Picture::Unreadable(_) => None,
        }
    }

    pub fn render(&self) -> String {
        let board = match &self.picture {
            Picture::Board(board) => board,
            Picture::Unreadable(fen) => return format!("  (cannot draw position: {fen})\n"),
        };

        let border = format!("  +{}+\n", "-".repeat(24));
        let mut out = border.clone();

        for rank in (0..8u32).rev() {
            out.push_str(&format!("{} |", rank + 1));
            for file in 0..8u32 {
                let square = Square::from_coords(File::new(file), Rank::new(rank));
                let glyph = board.piece_at(square).map_or('.', |p| p.char());
                out.push(' ');
                out.push(glyph);
                out.push(' ');
            }
            out.push_str("|\n");
        }

        out.push_str(&border);
        out.push_str("   ");
        for file in FILES.chars() {
            out.push(' ');
            out.push(file);
            out.push(' ');
        }
        out.push('\n');
        out
    }
}

impl Default for Chessboard {
    fn default() -> Self {
        Self::new()
    }
}

fn picture_for(fen: &str) -> Picture {
    if fen == START_POSITION {
        return Picture::Board(Board::new());
    }

    let placement = fen.split_whitespace().next().unwrap_or("");
    match placement.parse::<Board>() {
        Ok(board) => Picture::Board(board),
        Err(e) => {
            tracing::warn!(fen, "Cannot draw position: {e}");
            Picture::Unreadable(fen.to_string())
        }
    }
}

/// Read a typed drag gesture: `e2e4`, `e2 e4` or `e2-e4`.
pub fn parse_gesture(input: &str) -> Option<(Square, Square)> {
    let squares: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if squares.len() != 4 || !squares.is_ascii() {
        return None;
    }

    let source = squares[..2].parse().ok()?;
    let target = squares[2..].parse().ok()?;
    Some((source, target))
}
