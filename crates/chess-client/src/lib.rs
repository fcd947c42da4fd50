//! HTTP client for the Rusty Chess server.
//!
//! The server owns the game. This crate only knows the two endpoints it
//! exposes and hands FEN strings back to the caller untouched.

pub mod api;
pub mod config;
pub mod error;

pub use api::{ApiClient, GameState, MoveRequest, START_POSITION};
pub use config::Config;
pub use error::ClientError;
