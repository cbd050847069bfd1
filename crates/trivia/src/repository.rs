//! Repository façade over the remote source and the local store.
//!
//! Remote reads are write-through: fetched questions are cached before they
//! are returned. Everything else reads from the local store, so the app keeps
//! working offline with whatever was cached last.

use std::collections::HashMap;
use std::sync::Arc;

use futures_core::Stream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use trivia_core::question::{Category, Difficulty, Question};
use trivia_core::quiz::QuizRecord;
use trivia_core::source::{fetch_questions_stream, FetchState, QuestionRequest, QuestionSource};
use trivia_core::storage::{
    LocalStore, QueryStream, DEFAULT_RESULT_RETENTION, QUESTION_SCOPE, QUIZ_RESULT_SCOPE,
};
use trivia_core::TriviaError;

use crate::storage::watch_query;

/// Single entry point for question, favorite and quiz history data.
pub struct TriviaRepository<S, L> {
    source: Arc<S>,
    store: Arc<L>,
    retention: usize,
}

impl<S, L> Clone for TriviaRepository<S, L> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            retention: self.retention,
        }
    }
}

impl<S, L> TriviaRepository<S, L>
where
    S: QuestionSource + 'static,
    L: LocalStore + 'static,
{
    pub fn new(source: Arc<S>, store: Arc<L>) -> Self {
        Self {
            source,
            store,
            retention: DEFAULT_RESULT_RETENTION,
        }
    }

    /// Sets how many quiz records history keeps (at least one).
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    // ========================================================================
    // Remote reads
    // ========================================================================

    /// Fetches questions and caches them before returning.
    ///
    /// On a network failure the cache is left untouched. The returned
    /// questions carry their current favorite flag.
    pub async fn get_questions(
        &self,
        amount: u8,
        category: Option<u32>,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, TriviaError> {
        let request = QuestionRequest::new(amount, category, difficulty)?;
        self.fetch_and_cache(&request).await
    }

    /// Like [`get_questions`](Self::get_questions), observed as `Loading`
    /// followed by the outcome.
    ///
    /// `Success` is only yielded once the questions are cached; a cache
    /// write failure ends the stream with a storage `Failure`.
    pub fn fetch_questions_stream(
        &self,
        amount: u8,
        category: Option<u32>,
        difficulty: Difficulty,
    ) -> impl Stream<Item = FetchState<Vec<Question>>> + Send + 'static {
        let repo = self.clone();

        async_stream::stream! {
            let request = match QuestionRequest::new(amount, category, difficulty) {
                Ok(request) => request,
                Err(err) => {
                    yield FetchState::Loading;
                    yield FetchState::Failure(err.into());
                    return;
                }
            };

            let mut states = std::pin::pin!(fetch_questions_stream(Arc::clone(&repo.source), request));
            while let Some(state) = states.next().await {
                match state {
                    FetchState::Success(questions) => {
                        match repo.cache_questions(questions).await {
                            Ok(questions) => {
                                yield FetchState::Success(questions);
                            }
                            Err(err) => {
                                tracing::warn!(error = %err, "Fetched questions could not be cached");
                                yield FetchState::Failure(err);
                            }
                        }
                    }
                    other => {
                        yield other;
                    }
                }
            }
        }
    }

    /// Lists categories from the remote source. Not cached.
    pub async fn get_categories(&self) -> Result<Vec<Category>, TriviaError> {
        Ok(self.source.fetch_categories().await?)
    }

    async fn fetch_and_cache(&self, request: &QuestionRequest) -> Result<Vec<Question>, TriviaError> {
        let questions = self.source.fetch_questions(request).await.map_err(|err| {
            tracing::warn!(error = %err, amount = request.amount, "Question fetch failed");
            TriviaError::Network(err)
        })?;

        let questions = self.cache_questions(questions).await?;

        tracing::info!(
            count = questions.len(),
            category = ?request.category,
            difficulty = %request.difficulty,
            "Fetched and cached questions"
        );
        Ok(questions)
    }

    /// Writes a fetched batch to the store and returns it as cached.
    ///
    /// Duplicate ids collapse to one entry holding the last occurrence, so
    /// every returned question has its own row.
    async fn cache_questions(&self, questions: Vec<Question>) -> Result<Vec<Question>, TriviaError> {
        let mut questions = dedup_by_id(questions);

        self.store.insert_questions(&questions).await?;

        for question in &mut questions {
            question.is_favorite = self.store.is_favorite(question.id).await?;
        }
        Ok(questions)
    }

    // ========================================================================
    // Local reads
    // ========================================================================

    pub async fn cached_questions(&self) -> Result<Vec<Question>, TriviaError> {
        Ok(self.store.get_all_questions().await?)
    }

    pub async fn search_questions(&self, query: &str) -> Result<Vec<Question>, TriviaError> {
        Ok(self.store.search_questions(query).await?)
    }

    pub async fn favorite_questions(&self) -> Result<Vec<Question>, TriviaError> {
        Ok(self.store.get_favorite_questions().await?)
    }

    /// Quiz history, newest first, up to the retention limit.
    pub async fn quiz_results(&self) -> Result<Vec<QuizRecord>, TriviaError> {
        Ok(self.store.get_quiz_results(self.retention).await?)
    }

    pub async fn find_question(&self, id: Uuid) -> Result<Option<Question>, TriviaError> {
        Ok(self.store.get_question(id).await?)
    }

    pub async fn is_favorite(&self, id: Uuid) -> Result<bool, TriviaError> {
        Ok(self.store.is_favorite(id).await?)
    }

    pub async fn count_cached_questions(&self) -> Result<u64, TriviaError> {
        Ok(self.store.count_questions().await?)
    }

    // ========================================================================
    // Reactive reads
    // ========================================================================

    /// All cached questions, newest first.
    pub fn watch_cached_questions(&self) -> QueryStream<Vec<Question>> {
        watch_query(Arc::clone(&self.store), QUESTION_SCOPE, |store| async move {
            store.get_all_questions().await
        })
    }

    /// Cached questions whose text contains `query` (case-sensitive).
    pub fn watch_search(&self, query: impl Into<String>) -> QueryStream<Vec<Question>> {
        let query: Arc<str> = Arc::from(query.into());
        watch_query(Arc::clone(&self.store), QUESTION_SCOPE, move |store| {
            let query = Arc::clone(&query);
            async move { store.search_questions(&query).await }
        })
    }

    pub fn watch_favorite_questions(&self) -> QueryStream<Vec<Question>> {
        watch_query(Arc::clone(&self.store), QUESTION_SCOPE, |store| async move {
            store.get_favorite_questions().await
        })
    }

    pub fn watch_quiz_results(&self) -> QueryStream<Vec<QuizRecord>> {
        let limit = self.retention;
        watch_query(Arc::clone(&self.store), QUIZ_RESULT_SCOPE, move |store| async move {
            store.get_quiz_results(limit).await
        })
    }

    pub fn watch_latest_quiz_result(&self) -> QueryStream<Option<QuizRecord>> {
        watch_query(Arc::clone(&self.store), QUIZ_RESULT_SCOPE, |store| async move {
            store.get_latest_quiz_result().await
        })
    }

    /// Number of cached questions.
    pub fn watch_question_count(&self) -> QueryStream<u64> {
        watch_query(Arc::clone(&self.store), QUESTION_SCOPE, |store| async move {
            store.count_questions().await
        })
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Flips the favorite state of a cached question and returns the new state.
    pub async fn toggle_favorite(&self, question: &Question) -> Result<bool, TriviaError> {
        Ok(self.store.toggle_favorite(question.id).await?)
    }

    /// Saves a completed quiz, pruning history to the retention limit.
    ///
    /// Returns the number of records pruned.
    pub async fn save_quiz_result(&self, record: &QuizRecord) -> Result<usize, TriviaError> {
        Ok(self.store.save_quiz_result(record, self.retention).await?)
    }

    /// Removes every cached question (favorites go with them).
    pub async fn clear_cache(&self) -> Result<(), TriviaError> {
        Ok(self.store.clear_questions().await?)
    }

    /// Removes all quiz history.
    pub async fn clear_history(&self) -> Result<(), TriviaError> {
        Ok(self.store.clear_quiz_results().await?)
    }
}

/// Keeps the first position of each id with the last value seen for it.
fn dedup_by_id(questions: Vec<Question>) -> Vec<Question> {
    let mut positions: HashMap<Uuid, usize> = HashMap::with_capacity(questions.len());
    let mut unique: Vec<Question> = Vec::with_capacity(questions.len());

    for question in questions {
        match positions.get(&question.id) {
            Some(&index) => unique[index] = question,
            None => {
                positions.insert(question.id, unique.len());
                unique.push(question);
            }
        }
    }
    unique
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use tokio_stream::StreamExt;
    use trivia_core::source::SourceError;
    use trivia_core::storage::RepositoryError;

    use super::test_support::*;
    use super::*;
    use crate::storage::SqliteStore;

    type Repo = TriviaRepository<MockSource, SqliteStore>;

    async fn repo(response: Result<Vec<Question>, SourceError>) -> (Repo, Arc<MockSource>) {
        let source = Arc::new(MockSource::new(response));
        let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
        (TriviaRepository::new(Arc::clone(&source), store), source)
    }

    fn server_error() -> SourceError {
        SourceError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
    }

    fn record(minute: u32) -> QuizRecord {
        QuizRecord::new(
            Category::general_knowledge(),
            0,
            vec![],
            Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0).unwrap(),
        )
    }

    async fn next<T>(stream: &mut QueryStream<T>) -> T {
        tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("stream did not emit")
            .expect("stream ended")
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_caches_questions() {
        let (repo, source) = repo(Ok(questions(10))).await;

        let fetched = repo.get_questions(10, Some(9), Difficulty::Easy).await.unwrap();

        assert_eq!(fetched.len(), 10);
        for q in &fetched {
            assert!(q.answers().contains(&q.correct_answer));
        }
        assert_eq!(repo.count_cached_questions().await.unwrap(), 10);
        assert_eq!(
            source.last_request(),
            Some(QuestionRequest::new(10, Some(9), Difficulty::Easy).unwrap())
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_unchanged() {
        let (repo, source) = repo(Ok(questions(3))).await;
        repo.get_questions(3, None, Difficulty::Medium).await.unwrap();
        let before = repo.cached_questions().await.unwrap();

        source.respond_with(Err(server_error()));
        let err = repo.get_questions(10, None, Difficulty::Medium).await.unwrap_err();

        assert!(matches!(
            err,
            TriviaError::Network(SourceError::Status { status: 500, .. })
        ));
        assert_eq!(repo.cached_questions().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_invalid_amount_is_rejected_before_fetch() {
        let (repo, source) = repo(Ok(questions(1))).await;

        let err = repo.get_questions(0, None, Difficulty::Easy).await.unwrap_err();

        assert!(matches!(
            err,
            TriviaError::Network(SourceError::InvalidRequest(_))
        ));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_refetch_keeps_favorite_flag() {
        let (repo, _) = repo(Ok(questions(2))).await;
        let first = repo.get_questions(2, None, Difficulty::Easy).await.unwrap();
        assert!(repo.toggle_favorite(&first[0]).await.unwrap());

        let second = repo.get_questions(2, None, Difficulty::Easy).await.unwrap();

        assert_eq!(repo.count_cached_questions().await.unwrap(), 2);
        assert!(second[0].is_favorite);
        assert!(!second[1].is_favorite);
        assert!(repo.is_favorite(first[0].id).await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_uncached_question_is_storage_error() {
        let (repo, _) = repo(Ok(vec![])).await;

        let err = repo.toggle_favorite(&question(1)).await.unwrap_err();

        assert!(matches!(
            err,
            TriviaError::Storage(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_stream_loading_then_success() {
        let (repo, _) = repo(Ok(questions(4))).await;

        let states: Vec<_> = repo
            .fetch_questions_stream(4, Some(9), Difficulty::Easy)
            .collect()
            .await;

        assert_eq!(states.len(), 2);
        assert!(states[0].is_loading());
        assert!(matches!(&states[1], FetchState::Success(q) if q.len() == 4));
        assert_eq!(repo.count_cached_questions().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_fetch_stream_failure() {
        let (repo, _) = repo(Err(server_error())).await;

        let states: Vec<_> = repo
            .fetch_questions_stream(4, None, Difficulty::Hard)
            .collect()
            .await;

        assert_eq!(
            states,
            vec![
                FetchState::Loading,
                FetchState::Failure(TriviaError::Network(server_error()))
            ]
        );
        assert_eq!(repo.count_cached_questions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_stream_reports_cache_write_failure() {
        let source = Arc::new(MockSource::new(Ok(questions(3))));
        let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
        store.execute_batch("DROP TABLE questions;").await.unwrap();
        let repo = TriviaRepository::new(source, store);

        let states: Vec<_> = repo
            .fetch_questions_stream(3, None, Difficulty::Easy)
            .collect()
            .await;

        assert_eq!(states.len(), 2);
        assert!(states[0].is_loading());
        assert!(matches!(
            &states[1],
            FetchState::Failure(TriviaError::Storage(RepositoryError::QueryFailed(_)))
        ));
        assert!(matches!(
            repo.get_questions(3, None, Difficulty::Easy).await,
            Err(TriviaError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_ids_in_batch_are_collapsed() {
        let mut repeated = question(1);
        repeated.incorrect_answers = vec!["Other 1".into(), "Other 2".into(), "Other 3".into()];
        let batch = vec![question(1), question(2), repeated.clone()];
        let (repo, _) = repo(Ok(batch)).await;

        let fetched = repo.get_questions(3, None, Difficulty::Easy).await.unwrap();

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].id, repeated.id);
        assert_eq!(fetched[0].incorrect_answers, repeated.incorrect_answers);
        assert_eq!(
            repo.count_cached_questions().await.unwrap(),
            fetched.len() as u64
        );
        let cached = repo.find_question(repeated.id).await.unwrap().unwrap();
        assert_eq!(cached.incorrect_answers, repeated.incorrect_answers);

        let states: Vec<_> = repo
            .fetch_questions_stream(3, None, Difficulty::Easy)
            .collect()
            .await;
        assert!(matches!(&states[1], FetchState::Success(q) if q.len() == 2));
    }

    #[tokio::test]
    async fn test_get_categories_passes_through() {
        let (repo, _) = repo(Ok(vec![])).await;

        assert_eq!(repo.get_categories().await.unwrap(), Category::builtin());
    }

    #[tokio::test]
    async fn test_watch_cached_questions_re_emits_after_fetch() {
        let (repo, _) = repo(Ok(questions(5))).await;
        let mut stream = repo.watch_cached_questions();
        assert!(next(&mut stream).await.is_empty());

        repo.get_questions(5, None, Difficulty::Easy).await.unwrap();

        assert_eq!(next(&mut stream).await.len(), 5);
    }

    #[tokio::test]
    async fn test_watch_favorites_re_emits_after_toggle() {
        let (repo, _) = repo(Ok(questions(3))).await;
        let fetched = repo.get_questions(3, None, Difficulty::Easy).await.unwrap();
        let mut stream = repo.watch_favorite_questions();
        assert!(next(&mut stream).await.is_empty());

        repo.toggle_favorite(&fetched[1]).await.unwrap();

        let favorites = next(&mut stream).await;
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, fetched[1].id);
        assert!(favorites[0].is_favorite);
    }

    #[tokio::test]
    async fn test_watch_search_filters() {
        let (repo, _) = repo(Ok(questions(12))).await;
        let mut stream = repo.watch_search("Question 1");
        assert!(next(&mut stream).await.is_empty());

        repo.get_questions(12, None, Difficulty::Easy).await.unwrap();

        let texts: Vec<String> = next(&mut stream).await.into_iter().map(|q| q.question).collect();
        assert_eq!(texts, vec!["Question 11?", "Question 10?", "Question 1?"]);
    }

    #[tokio::test]
    async fn test_save_quiz_result_applies_retention() {
        let (repo, _) = repo(Ok(vec![])).await;
        let repo = repo.with_retention(2);
        let mut latest = repo.watch_latest_quiz_result();
        assert!(next(&mut latest).await.is_none());

        for minute in 0..3 {
            repo.save_quiz_result(&record(minute)).await.unwrap();
        }

        let history = repo.quiz_results().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].timestamp, record(2).timestamp);
        assert!(next(&mut latest).await.is_some());
    }

    #[tokio::test]
    async fn test_clear_history_keeps_cache() {
        let (repo, _) = repo(Ok(questions(2))).await;
        repo.get_questions(2, None, Difficulty::Easy).await.unwrap();
        repo.save_quiz_result(&record(0)).await.unwrap();

        repo.clear_history().await.unwrap();

        assert!(repo.quiz_results().await.unwrap().is_empty());
        assert_eq!(repo.count_cached_questions().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_keeps_history() {
        let (repo, _) = repo(Ok(questions(2))).await;
        repo.get_questions(2, None, Difficulty::Easy).await.unwrap();
        repo.save_quiz_result(&record(0)).await.unwrap();
        let mut count = repo.watch_question_count();
        assert_eq!(next(&mut count).await, 2);

        repo.clear_cache().await.unwrap();

        assert_eq!(next(&mut count).await, 0);
        assert_eq!(repo.quiz_results().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_retention_is_at_least_one() {
        let (repo, _) = repo(Ok(vec![])).await;

        let repo = repo.with_retention(0);
        repo.save_quiz_result(&record(0)).await.unwrap();
        repo.save_quiz_result(&record(1)).await.unwrap();

        assert_eq!(repo.retention(), 1);
        assert_eq!(repo.quiz_results().await.unwrap().len(), 1);
    }
}
