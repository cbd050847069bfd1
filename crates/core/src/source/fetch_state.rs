//! Loading-then-result view over a single fetch.

use std::sync::Arc;

use futures_core::Stream;

use crate::error::TriviaError;
use crate::question::Question;

use super::{QuestionRequest, QuestionSource, SourceError};

/// State of an in-flight fetch as observed by a UI-style consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    Loading,
    Success(T),
    Failure(TriviaError),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Converts a terminal state into a result.
    ///
    /// `Loading` is not terminal; reaching this with it is a logic error and
    /// is reported as [`TriviaError::InvariantViolation`] instead of being
    /// defaulted.
    pub fn into_result(self) -> Result<T, TriviaError> {
        match self {
            FetchState::Success(value) => Ok(value),
            FetchState::Failure(err) => Err(err),
            FetchState::Loading => Err(TriviaError::InvariantViolation(
                "fetch result read while still loading".to_string(),
            )),
        }
    }
}

impl<T> From<Result<T, SourceError>> for FetchState<T> {
    fn from(result: Result<T, SourceError>) -> Self {
        match result {
            Ok(value) => FetchState::Success(value),
            Err(err) => FetchState::Failure(TriviaError::Network(err)),
        }
    }
}

/// Fetches questions once, yielding `Loading` and then the outcome.
pub fn fetch_questions_stream<S>(
    source: Arc<S>,
    request: QuestionRequest,
) -> impl Stream<Item = FetchState<Vec<Question>>> + Send
where
    S: QuestionSource + ?Sized + 'static,
{
    async_stream::stream! {
        yield FetchState::Loading;
        yield FetchState::from(source.fetch_questions(&request).await);
    }
}
