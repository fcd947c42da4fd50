#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chess_client::{ApiClient, Config};
use serde_json::{json, Value};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
pub const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

/// What the stub answers on one endpoint.
#[derive(Clone, Debug)]
pub enum Reply {
    Fen(String),
    Json(Value),
    Status(StatusCode, String),
}

impl Reply {
    pub fn fen(fen: &str) -> Self {
        Reply::Fen(fen.to_string())
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Fen(fen) => Json(json!({ "board_fen": fen })).into_response(),
            Reply::Json(body) => Json(body).into_response(),
            Reply::Status(status, body) => (status, body).into_response(),
        }
    }
}

struct StubState {
    board: Reply,
    board_delay: Duration,
    move_delay: Duration,
    /// Accepted moves; anything else is answered with 400 "Illegal move".
    moves: HashMap<String, Reply>,
    received: Vec<Value>,
}

/// In-process stand-in for the chess server's two endpoints.
#[derive(Clone)]
pub struct Stub {
    state: Arc<Mutex<StubState>>,
}

impl Stub {
    pub fn new(board: Reply) -> Self {
        Self {
            state: Arc::new(Mutex::new(StubState {
                board,
                board_delay: Duration::ZERO,
                move_delay: Duration::ZERO,
                moves: HashMap::new(),
                received: Vec::new(),
            })),
        }
    }

    pub fn with_move(self, chess_move: &str, reply: Reply) -> Self {
        self.state
            .lock()
            .unwrap()
            .moves
            .insert(chess_move.to_string(), reply);
        self
    }

    pub fn with_board_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().board_delay = delay;
        self
    }

    pub fn with_move_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().move_delay = delay;
        self
    }

    pub fn set_board(&self, board: Reply) {
        self.state.lock().unwrap().board = board;
    }

    /// Bodies of every `POST /move` received so far.
    pub fn received(&self) -> Vec<Value> {
        self.state.lock().unwrap().received.clone()
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/board", get(get_board))
            .route("/move", post(make_move))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server error");
        });

        format!("http://{addr}")
    }
}

async fn get_board(State(stub): State<Stub>) -> Response {
    let (reply, delay) = {
        let state = stub.state.lock().unwrap();
        (state.board.clone(), state.board_delay)
    };
    tokio::time::sleep(delay).await;
    reply.into_response()
}

async fn make_move(State(stub): State<Stub>, Json(body): Json<Value>) -> Response {
    let (reply, delay) = {
        let mut state = stub.state.lock().unwrap();
        state.received.push(body.clone());

        let chess_move = body["chess_move"].as_str().unwrap_or_default();
        let reply = state.moves.get(chess_move).cloned().unwrap_or(Reply::Status(
            StatusCode::BAD_REQUEST,
            "Illegal move".to_string(),
        ));
        (reply, state.move_delay)
    };
    tokio::time::sleep(delay).await;
    reply.into_response()
}

/// Client pointed at `base_url` with a short timeout.
pub fn client(base_url: &str) -> ApiClient {
    let config = Config {
        timeout_secs: 5,
        ..Config::default()
    }
    .with_api_url(base_url);
    ApiClient::new(&config).expect("Failed to build client")
}

/// Base URL of a port nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
