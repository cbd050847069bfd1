//! One-operation entry points over [`TriviaRepository`].
//!
//! Each use case holds a shared handle to the repository and exposes a
//! single `execute`-style method, so callers depend on exactly the
//! operation they need.

use std::sync::Arc;

use trivia_core::question::{Category, Difficulty, Question};
use trivia_core::quiz::QuizRecord;
use trivia_core::source::QuestionSource;
use trivia_core::storage::{LocalStore, QueryStream};
use trivia_core::TriviaError;

use crate::repository::TriviaRepository;

macro_rules! use_case {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<S, L> {
            repository: Arc<TriviaRepository<S, L>>,
        }

        impl<S, L> $name<S, L>
        where
            S: QuestionSource + 'static,
            L: LocalStore + 'static,
        {
            pub fn new(repository: Arc<TriviaRepository<S, L>>) -> Self {
                Self { repository }
            }
        }
    };
}

use_case!(
    /// Fetches questions from the remote source, caching them.
    GetQuestions
);
use_case!(
    /// Lists the remote categories.
    GetCategories
);
use_case!(
    /// Observes favorited questions.
    GetFavoriteQuestions
);
use_case!(
    /// Flips the favorite flag of a cached question.
    ToggleFavorite
);
use_case!(
    /// Saves a finished quiz to history.
    SaveQuizResult
);
use_case!(
    /// Observes quiz history, newest first.
    GetQuizResults
);
use_case!(
    /// Deletes all quiz history.
    ClearHistory
);
use_case!(
    /// Deletes all cached questions.
    ClearCache
);
use_case!(
    /// Observes cache statistics.
    GetStatistics
);

impl<S: QuestionSource + 'static, L: LocalStore + 'static> GetQuestions<S, L> {
    pub async fn execute(
        &self,
        amount: u8,
        category: Option<u32>,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, TriviaError> {
        self.repository.get_questions(amount, category, difficulty).await
    }
}

impl<S: QuestionSource + 'static, L: LocalStore + 'static> GetCategories<S, L> {
    pub async fn execute(&self) -> Result<Vec<Category>, TriviaError> {
        self.repository.get_categories().await
    }
}

impl<S: QuestionSource + 'static, L: LocalStore + 'static> GetFavoriteQuestions<S, L> {
    pub fn execute(&self) -> QueryStream<Vec<Question>> {
        self.repository.watch_favorite_questions()
    }
}

impl<S: QuestionSource + 'static, L: LocalStore + 'static> ToggleFavorite<S, L> {
    /// Returns the new favorite state.
    pub async fn execute(&self, question: &Question) -> Result<bool, TriviaError> {
        self.repository.toggle_favorite(question).await
    }
}

impl<S: QuestionSource + 'static, L: LocalStore + 'static> SaveQuizResult<S, L> {
    /// Returns how many old records were pruned.
    pub async fn execute(&self, record: &QuizRecord) -> Result<usize, TriviaError> {
        self.repository.save_quiz_result(record).await
    }
}

impl<S: QuestionSource + 'static, L: LocalStore + 'static> GetQuizResults<S, L> {
    pub fn execute(&self) -> QueryStream<Vec<QuizRecord>> {
        self.repository.watch_quiz_results()
    }
}

impl<S: QuestionSource + 'static, L: LocalStore + 'static> ClearHistory<S, L> {
    pub async fn execute(&self) -> Result<(), TriviaError> {
        self.repository.clear_history().await
    }
}

impl<S: QuestionSource + 'static, L: LocalStore + 'static> ClearCache<S, L> {
    pub async fn execute(&self) -> Result<(), TriviaError> {
        self.repository.clear_cache().await
    }
}

impl<S: QuestionSource + 'static, L: LocalStore + 'static> GetStatistics<S, L> {
    /// Emits the number of cached questions now and after every change.
    pub fn execute(&self) -> QueryStream<u64> {
        self.repository.watch_question_count()
    }
}
