use thiserror::Error;

use crate::quiz::QuizError;
use crate::source::SourceError;
use crate::storage::RepositoryError;

/// Errors surfaced by the repository façade.
///
/// Network and storage failures are ordinary, recoverable results. An
/// invariant violation means the code reached a state it treats as a bug.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TriviaError {
    #[error("Network failure: {0}")]
    Network(#[from] SourceError),
    #[error("Storage failure: {0}")]
    Storage(#[from] RepositoryError),
    #[error("Invalid quiz: {0}")]
    Quiz(#[from] QuizError),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}
