//! The UI event loop.
//!
//! Everything the page shows is owned here and only touched on the loop's
//! task. Network calls run as spawned tasks and report back through a
//! channel, so the prompt stays usable while the server thinks.

use std::io::{self, Write};

use chess_client::{ApiClient, ClientError};
use shakmaty::Square;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::page::{Page, HELP};
use crate::view::{BoardView, FetchTicket, MoveOutcome, MoveTicket};
use crate::widget::{parse_gesture, Chessboard};

pub const INVALID_MOVE: &str = "Invalid move";

/// Answer of a spawned network call.
#[derive(Debug)]
pub enum Completion {
    /// Mount fetch; failures were already folded into the start position.
    Board { ticket: FetchTicket, fen: String },
    Refresh {
        ticket: FetchTicket,
        result: Result<String, ClientError>,
    },
    Move {
        seq: u64,
        result: Result<String, ClientError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    api: ApiClient,
    view: BoardView,
    board: Chessboard,
    page: Page<W>,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<W: Write> Session<W> {
    pub fn new(api: ApiClient, out: W) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            view: BoardView::new(),
            board: Chessboard::new(),
            page: Page::new(out),
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Displayed position.
    pub fn position(&self) -> &str {
        self.view.position()
    }

    pub fn board(&self) -> &Chessboard {
        &self.board
    }

    pub fn is_pending(&self) -> bool {
        self.view.is_pending()
    }

    /// Network calls whose answers have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn into_output(self) -> W {
        self.page.into_inner()
    }

    /// First render: draw the sentinel board and ask the server for the real one.
    pub fn mount(&mut self) -> io::Result<()> {
        self.redraw()?;
        let ticket = self.view.request_board();
        self.spawn_fetch(ticket);
        Ok(())
    }

    pub fn refresh(&mut self) {
        let ticket = self.view.request_board();
        self.spawn_refresh(ticket);
    }

    /// Drag-and-drop gesture. Returns whether the widget keeps the piece
    /// where it was dropped.
    pub fn piece_drop(&mut self, source: Square, target: Square) -> io::Result<bool> {
        let Some(ticket) = self.view.piece_drop(source, target) else {
            self.page.note("Still waiting for the last move.")?;
            return Ok(false);
        };

        self.board.drag(source, target);
        self.spawn_move(ticket);
        self.redraw()?;
        Ok(true)
    }

    /// Handle one line of input.
    pub fn command(&mut self, line: &str) -> io::Result<Flow> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" => {}
            "q" | "quit" | "exit" => return Ok(Flow::Quit),
            "r" | "refresh" => self.refresh(),
            "h" | "help" | "?" => self.page.note(HELP)?,
            other => match parse_gesture(other) {
                Some((source, target)) => {
                    self.piece_drop(source, target)?;
                }
                None => self
                    .page
                    .note(&format!("Not a move: `{line}`. Type `help` for commands."))?,
            },
        }
        Ok(Flow::Continue)
    }

    /// Wait for the next network answer and apply it.
    /// Returns `false` when nothing is in flight.
    pub async fn settle(&mut self) -> io::Result<bool> {
        if self.in_flight == 0 {
            return Ok(false);
        }
        match self.rx.recv().await {
            Some(completion) => {
                self.apply(completion)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply answers until nothing is in flight.
    pub async fn settle_all(&mut self) -> io::Result<()> {
        while self.settle().await? {}
        Ok(())
    }

    pub fn apply(&mut self, completion: Completion) -> io::Result<()> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match completion {
            Completion::Board { ticket, fen } => {
                if self.view.board_loaded(ticket, fen) {
                    self.sync_board_unless_pending();
                    self.redraw()?;
                }
            }
            Completion::Refresh { ticket, result } => match result {
                Ok(fen) => {
                    if self.view.board_loaded(ticket, fen) {
                        self.sync_board_unless_pending();
                        self.redraw()?;
                    }
                }
                Err(e) => {
                    warn!("Refresh failed, keeping current position: {e}");
                    self.page.note("Could not refresh the board.")?;
                }
            },
            Completion::Move { seq, result } => {
                match self.view.move_resolved(seq, result) {
                    MoveOutcome::Applied => info!(seq, "Move accepted"),
                    MoveOutcome::Stale => debug!(seq, "Move accepted, newer position already shown"),
                    MoveOutcome::Rejected => self.page.alert(INVALID_MOVE)?,
                }
                // Drop the optimistic drag and show what the view holds.
                self.sync_board();
                self.redraw()?;
            }
        }
        Ok(())
    }

    /// Run until `quit` or end of input. Answers still in flight at end of
    /// input are waited for; after `quit` they are dropped.
    pub async fn run<R>(mut self, mut input: R) -> anyhow::Result<W>
    where
        R: AsyncBufRead + Unpin,
    {
        // Raw bytes so a garbled line is just another unknown command.
        // Survives a cancelled read: partial input stays in `buf`.
        let mut buf = Vec::new();
        self.mount()?;

        loop {
            tokio::select! {
                read = input.read_until(b'\n', &mut buf) => {
                    read?;
                    if buf.is_empty() {
                        self.settle_all().await?;
                        break;
                    }
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    buf.clear();
                    if self.command(&line)? == Flow::Quit {
                        break;
                    }
                }
                Some(completion) = self.rx.recv() => self.apply(completion)?,
            }
        }

        info!("Session closed");
        Ok(self.into_output())
    }

    fn sync_board(&mut self) {
        self.board.set_position(self.view.position());
    }

    /// Keep the dropped piece where the user put it until the move's own
    /// answer reconciles the widget.
    fn sync_board_unless_pending(&mut self) {
        if !self.view.is_pending() {
            self.sync_board();
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.page
            .draw(&self.board, self.view.position(), self.view.is_pending())
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let fen = api.get_board().await;
            let _ = tx.send(Completion::Board { ticket, fen });
        });
    }

    fn spawn_refresh(&mut self, ticket: FetchTicket) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = api.fetch_board().await;
            let _ = tx.send(Completion::Refresh { ticket, result });
        });
    }

    fn spawn_move(&mut self, ticket: MoveTicket) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = api.make_move(&ticket.chess_move).await;
            let _ = tx.send(Completion::Move {
                seq: ticket.seq,
                result,
            });
        });
    }
}
