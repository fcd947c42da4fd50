//! Board view state.
//!
//! Holds the one position the page displays plus the bookkeeping that keeps
//! late network answers from clobbering newer ones. Nothing here does I/O:
//! the session issues the requests this module hands out and feeds the
//! answers back in.

use chess_client::START_POSITION;
use shakmaty::Square;

/// A board fetch the session should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
}

/// A move the session should submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTicket {
    pub seq: u64,
    pub chess_move: String,
}

/// What happened when a move answer came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The returned position is now displayed.
    Applied,
    /// The server refused the move or could not be reached.
    Rejected,
    /// The move went through but something newer is already displayed.
    Stale,
}

#[derive(Debug)]
pub struct BoardView {
    position: String,
    /// Sequence of the move in flight, if any.
    pending: Option<u64>,
    next_seq: u64,
    /// Sequence of the answer that produced `position`. 0 is the sentinel.
    shown_seq: u64,
}

impl BoardView {
    pub fn new() -> Self {
        Self {
            position: START_POSITION.to_string(),
            pending: None,
            next_seq: 1,
            shown_seq: 0,
        }
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// First render. Also used for explicit refreshes.
    pub fn request_board(&mut self) -> FetchTicket {
        FetchTicket {
            seq: self.issue(),
        }
    }

    /// Apply a fetched position unless something newer is already shown.
    /// Returns whether the display changed hands.
    pub fn board_loaded(&mut self, ticket: FetchTicket, fen: String) -> bool {
        if ticket.seq < self.shown_seq {
            tracing::debug!(seq = ticket.seq, shown = self.shown_seq, "Discarding stale board");
            return false;
        }
        self.show(ticket.seq, fen);
        true
    }

    /// Gesture from the widget. `None` means the gesture is refused and the
    /// widget should put the piece back; only one move may be in flight.
    pub fn piece_drop(&mut self, source: Square, target: Square) -> Option<MoveTicket> {
        if let Some(seq) = self.pending {
            tracing::debug!(seq, "Move already in flight, refusing gesture");
            return None;
        }

        let seq = self.issue();
        self.pending = Some(seq);
        Some(MoveTicket {
            seq,
            chess_move: format!("{source}{target}"),
        })
    }

    /// Feed back the answer to a [`MoveTicket`].
    pub fn move_resolved<E>(&mut self, seq: u64, result: Result<String, E>) -> MoveOutcome {
        if self.pending == Some(seq) {
            self.pending = None;
        }

        match result {
            Err(_) => MoveOutcome::Rejected,
            Ok(_) if seq < self.shown_seq => MoveOutcome::Stale,
            Ok(fen) => {
                self.show(seq, fen);
                MoveOutcome::Applied
            }
        }
    }

    fn issue(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn show(&mut self, seq: u64, fen: String) {
        self.shown_seq = seq;
        self.position = fen;
    }
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new()
    }
}
