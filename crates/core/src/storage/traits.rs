use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::question::Question;
use crate::quiz::QuizRecord;

use super::{Result, StoreChange};

/// Cached question operations.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Upserts questions by id; the latest write wins.
    async fn insert_questions(&self, questions: &[Question]) -> Result<()>;

    /// Gets a question by its ID.
    async fn get_question(&self, id: Uuid) -> Result<Option<Question>>;

    /// Gets all cached questions, newest first.
    async fn get_all_questions(&self) -> Result<Vec<Question>>;

    /// Case-sensitive substring search over question text, newest first,
    /// capped at [`super::SEARCH_LIMIT`] rows.
    async fn search_questions(&self, query: &str) -> Result<Vec<Question>>;

    /// Counts cached questions.
    async fn count_questions(&self) -> Result<u64>;

    /// Removes every cached question (and, by cascade, their favorites).
    async fn clear_questions(&self) -> Result<()>;
}

/// Favorite relation operations.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Returns true if the question is favorited.
    async fn is_favorite(&self, question_id: Uuid) -> Result<bool>;

    /// Flips the favorite state atomically and returns the new state.
    async fn toggle_favorite(&self, question_id: Uuid) -> Result<bool>;

    /// Marks a question as favorite; no-op if it already is.
    async fn add_favorite(&self, question_id: Uuid) -> Result<()>;

    /// Unmarks a question; no-op if it is not a favorite.
    async fn remove_favorite(&self, question_id: Uuid) -> Result<()>;

    /// Gets all favorited questions, newest first.
    async fn get_favorite_questions(&self) -> Result<Vec<Question>>;
}

/// Quiz history operations.
#[async_trait]
pub trait QuizResultStore: Send + Sync {
    /// Saves a record and prunes history to `retention` rows in one transaction.
    ///
    /// Returns the number of pruned records.
    async fn save_quiz_result(&self, record: &QuizRecord, retention: usize) -> Result<usize>;

    /// Gets up to `limit` records, newest first.
    async fn get_quiz_results(&self, limit: usize) -> Result<Vec<QuizRecord>>;

    /// Gets the most recent record.
    async fn get_latest_quiz_result(&self) -> Result<Option<QuizRecord>>;

    /// Counts stored records.
    async fn count_quiz_results(&self) -> Result<u64>;

    /// Removes all quiz history.
    async fn clear_quiz_results(&self) -> Result<()>;
}

/// Change notifications for reactive reads.
pub trait StoreWatch: Send + Sync {
    /// Subscribes to committed changes.
    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange>;
}

/// Combined trait for a local store backing the repository.
pub trait LocalStore: QuestionStore + FavoriteStore + QuizResultStore + StoreWatch {}

impl<T: QuestionStore + FavoriteStore + QuizResultStore + StoreWatch> LocalStore for T {}
