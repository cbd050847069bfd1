use thiserror::Error;

/// Errors reported by a remote question source.
///
/// A source makes exactly one attempt per call; these errors are returned
/// to the caller as-is, never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Empty response body (status {status})")]
    EmptyBody { status: u16 },
    #[error("Trivia API returned response code {code}: {}", describe_api_code(.code))]
    Api { code: u8 },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl SourceError {
    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } | SourceError::EmptyBody { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

fn describe_api_code(code: &u8) -> &'static str {
    api_code_description(*code)
}

/// Describes the in-band `response_code` values of the trivia API.
pub fn api_code_description(code: u8) -> &'static str {
    match code {
        0 => "success",
        1 => "not enough questions for the query",
        2 => "invalid parameter",
        3 => "session token not found",
        4 => "session token exhausted",
        5 => "rate limit exceeded",
        _ => "unknown response code",
    }
}
