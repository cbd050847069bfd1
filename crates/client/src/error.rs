//! Client error types.

use thiserror::Error;
use trivia_core::source::SourceError;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Server returned {status} with an empty body")]
    EmptyBody { status: u16 },

    #[error("Trivia API response code {code}")]
    Api { code: u8 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ClientError> for SourceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ServerError { status, message } => SourceError::Status { status, message },
            ClientError::EmptyBody { status } => SourceError::EmptyBody { status },
            ClientError::Api { code } => SourceError::Api { code },
            ClientError::InvalidResponse(message) => SourceError::Decode(message),
            ClientError::Json(err) => SourceError::Decode(err.to_string()),
            ClientError::Request(err) if err.is_decode() => SourceError::Decode(err.to_string()),
            ClientError::Request(err) => SourceError::Transport(err.to_string()),
        }
    }
}
