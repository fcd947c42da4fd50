//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}
