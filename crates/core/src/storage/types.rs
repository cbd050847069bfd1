use std::pin::Pin;

use futures_core::Stream;
use serde::{Deserialize, Serialize};

use super::Result;

/// Maximum rows returned by a question search.
pub const SEARCH_LIMIT: usize = 20;

/// Default number of quiz records kept in history.
pub const DEFAULT_RESULT_RETENTION: usize = 10;

/// A query result that re-emits whenever its underlying tables change.
pub type QueryStream<T> = Pin<Box<dyn Stream<Item = Result<T>> + Send>>;

/// Table touched by a committed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreChange {
    Questions,
    Favorites,
    QuizResults,
}

/// Tables a question listing depends on (rows plus the favorite flag).
pub const QUESTION_SCOPE: &[StoreChange] = &[StoreChange::Questions, StoreChange::Favorites];

/// Tables quiz history depends on.
pub const QUIZ_RESULT_SCOPE: &[StoreChange] = &[StoreChange::QuizResults];

impl StoreChange {
    /// Returns true if a query over `scope` must be re-run after this change.
    pub fn affects(&self, scope: &[StoreChange]) -> bool {
        scope.contains(self)
    }
}
