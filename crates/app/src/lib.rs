//! Terminal front-end for a remote chess server.

pub mod page;
pub mod session;
pub mod view;
pub mod widget;

pub use session::{Completion, Flow, Session, INVALID_MOVE};
pub use view::{BoardView, MoveOutcome};
pub use widget::{parse_gesture, Chessboard};
