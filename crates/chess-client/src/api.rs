use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ClientError;

/// Position shown before the server has answered, and whenever the board
/// could not be fetched.
pub const START_POSITION: &str = "start";

/// Response body of both `GET /board` and `POST /move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board_fen: String,
}

/// Request body of `POST /move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub chess_move: String,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent("RustyChess/0.1")
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the board with `GET /board`, yielding [`START_POSITION`] on any
    /// transport or server problem.
    pub async fn get_board(&self) -> String {
        match self.fetch_board().await {
            Ok(fen) => fen,
            Err(e) => {
                tracing::warn!("Failed to fetch board, showing start position: {e}");
                START_POSITION.to_string()
            }
        }
    }

    /// Fetch the board with `GET /board`, returning the error instead of
    /// falling back.
    pub async fn fetch_board(&self) -> Result<String, ClientError> {
        let url = self.config.url("/board");
        tracing::debug!(%url, "Fetching board");

        let resp = self.client.get(&url).send().await?;
        let state = read_game_state(resp).await?;
        Ok(state.board_fen)
    }

    /// Submit a move with `POST /move`, sent as-is; the server decides
    /// whether it is legal.
    pub async fn make_move(&self, chess_move: &str) -> Result<String, ClientError> {
        let url = self.config.url("/move");
        tracing::debug!(%url, chess_move, "Submitting move");

        let body = MoveRequest {
            chess_move: chess_move.to_string(),
        };

        let result = match self.client.post(&url).json(&body).send().await {
            Ok(resp) => read_game_state(resp).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(state) => Ok(state.board_fen),
            Err(e) => {
                tracing::warn!(chess_move, "Move failed: {e}");
                Err(e)
            }
        }
    }
}

/// Check the status and pull `board_fen` out of the body.
async fn read_game_state(resp: Response) -> Result<GameState, ClientError> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(ClientError::Rejected {
            status,
            body: text.trim().to_string(),
        });
    }

    Ok(serde_json::from_str(&text)?)
}
