//! SQLite local store.
//!
//! Implements the store traits from `trivia_core::storage` using SQLite. All
//! statements run on the single `tokio-rusqlite` connection thread; writes
//! that must be atomic run in one `IMMEDIATE` transaction, and a
//! [`StoreChange`] is broadcast only after the commit succeeded.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tokio::sync::broadcast;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use trivia_core::question::Question;
use trivia_core::quiz::QuizRecord;
use trivia_core::storage::{
    FavoriteStore, QuestionStore, QuizResultStore, RepositoryError, Result, StoreChange,
    StoreWatch, SEARCH_LIMIT,
};

use super::conversions::{
    datetime_to_millis, index_to_sql, row_to_question, row_to_quiz_answer, row_to_quiz_record,
    string_list_to_json,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Buffered change notifications per subscriber before it lags.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// A question row ready to bind.
struct QuestionParams {
    id: String,
    question: String,
    correct_answer: String,
    incorrect_answers: String,
    category: String,
    kind: String,
}

impl QuestionParams {
    fn from_question(question: &Question) -> Result<Self> {
        Ok(Self {
            id: question.id.to_string(),
            question: question.question.clone(),
            correct_answer: question.correct_answer.clone(),
            incorrect_answers: string_list_to_json(&question.incorrect_answers)?,
            category: question.category.clone(),
            kind: question.kind.clone(),
        })
    }
}

/// A quiz answer row ready to bind.
struct AnswerParams {
    position: i64,
    question: QuestionParams,
    choices: String,
    selected_index: i64,
    correct_index: i64,
    is_correct: bool,
}

/// SQLite-backed local store.
///
/// Constructed explicitly and shared by `Arc`; there is no global instance.
pub struct SqliteStore {
    conn: Connection,
    changes: broadcast::Sender<StoreChange>,
}

impl SqliteStore {
    /// Opens (or creates) a file-based database and ensures the schema exists.
    pub async fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        tracing::debug!(path, "Opened SQLite store");
        Self::from_connection(conn).await
    }

    /// Opens an in-memory database. Data is lost when the store is dropped.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::from_connection(conn).await
    }

    async fn from_connection(conn: Connection) -> Result<Self> {
        Self::init_schema(&conn).await?;
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self { conn, changes })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Runs raw SQL against the store, bypassing change notifications.
    #[cfg(test)]
    pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
        self.conn
            .call(move |conn| conn.execute_batch(sql).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Store"))
    }

    /// Publishes a committed change. Having no subscribers is not an error.
    fn notify(&self, change: StoreChange) {
        let receivers = self.changes.send(change).unwrap_or(0);
        tracing::trace!(?change, receivers, "Store change published");
    }

    async fn query_questions(&self, sql: &'static str) -> Result<Vec<Question>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_question).map_err(wrap_err)?;

                let mut questions = Vec::new();
                for row_result in rows {
                    questions.push(row_result.map_err(wrap_err)?);
                }
                Ok(questions)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Question"))
    }

    async fn count(&self, sql: &'static str, entity_type: &'static str) -> Result<u64> {
        let count: i64 = self
            .conn
            .call(move |conn| conn.query_row(sql, [], |row| row.get(0)).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Sets the favorite flag in one transaction and returns whether it changed.
    async fn set_favorite(&self, question_id: Uuid, favorite: bool) -> Result<bool> {
        let id_str = question_id.to_string();
        let now = datetime_to_millis(&Utc::now());

        let changed = self
            .conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                ensure_question_exists(&tx, &id_str)?;
                let affected = if favorite {
                    tx.execute(schema::INSERT_FAVORITE, params![id_str, now])
                } else {
                    tx.execute(schema::DELETE_FAVORITE, [&id_str])
                }
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(affected > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Question", question_id.to_string()))?;

        if changed {
            self.notify(StoreChange::Favorites);
        }
        Ok(changed)
    }
}

/// Fails with `QueryReturnedNoRows` (mapped to `NotFound`) if the question is missing.
fn ensure_question_exists(
    conn: &rusqlite::Connection,
    id: &str,
) -> std::result::Result<(), tokio_rusqlite::Error> {
    let exists: bool = conn
        .query_row(schema::QUESTION_EXISTS, [id], |row| row.get(0))
        .map_err(wrap_err)?;
    if exists {
        Ok(())
    } else {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    }
}

// ============================================================================
// QuestionStore implementation
// ============================================================================

#[async_trait]
impl QuestionStore for SqliteStore {
    async fn insert_questions(&self, questions: &[Question]) -> Result<()> {
        if questions.is_empty() {
            return Ok(());
        }

        let rows = questions
            .iter()
            .map(QuestionParams::from_question)
            .collect::<Result<Vec<_>>>()?;
        let count = rows.len();
        let now = datetime_to_millis(&Utc::now());

        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                {
                    let mut stmt = tx.prepare(schema::UPSERT_QUESTION).map_err(wrap_err)?;
                    for row in &rows {
                        stmt.execute(params![
                            row.id,
                            row.question,
                            row.correct_answer,
                            row.incorrect_answers,
                            row.category,
                            row.kind,
                            now,
                        ])
                        .map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Question"))?;

        tracing::debug!(count, "Cached questions");
        self.notify(StoreChange::Questions);
        Ok(())
    }

    async fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_QUESTION_BY_ID, [&id_str], row_to_question)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Question", id.to_string()))
    }

    async fn get_all_questions(&self) -> Result<Vec<Question>> {
        self.query_questions(schema::SELECT_ALL_QUESTIONS).await
    }

    async fn search_questions(&self, query: &str) -> Result<Vec<Question>> {
        let needle = query.to_string();
        let limit = i64::try_from(SEARCH_LIMIT).unwrap_or(i64::MAX);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SEARCH_QUESTIONS).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params![needle, limit], row_to_question)
                    .map_err(wrap_err)?;

                let mut questions = Vec::new();
                for row_result in rows {
                    questions.push(row_result.map_err(wrap_err)?);
                }
                Ok(questions)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Question"))
    }

    async fn count_questions(&self) -> Result<u64> {
        self.count(schema::COUNT_QUESTIONS, "Question").await
    }

    async fn clear_questions(&self) -> Result<()> {
        let removed = self
            .conn
            .call(|conn| conn.execute(schema::DELETE_ALL_QUESTIONS, []).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Question"))?;

        tracing::info!(removed, "Cleared question cache");
        self.notify(StoreChange::Questions);
        Ok(())
    }
}

// ============================================================================
// FavoriteStore implementation
// ============================================================================

#[async_trait]
impl FavoriteStore for SqliteStore {
    async fn is_favorite(&self, question_id: Uuid) -> Result<bool> {
        let id_str = question_id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::FAVORITE_EXISTS, [&id_str], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Favorite", question_id.to_string()))
    }

    async fn toggle_favorite(&self, question_id: Uuid) -> Result<bool> {
        let id_str = question_id.to_string();
        let now = datetime_to_millis(&Utc::now());

        let favorite = self
            .conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                ensure_question_exists(&tx, &id_str)?;
                let was_favorite: bool = tx
                    .query_row(schema::FAVORITE_EXISTS, [&id_str], |row| row.get(0))
                    .map_err(wrap_err)?;
                if was_favorite {
                    tx.execute(schema::DELETE_FAVORITE, [&id_str])
                        .map_err(wrap_err)?;
                } else {
                    tx.execute(schema::INSERT_FAVORITE, params![id_str, now])
                        .map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(!was_favorite)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Question", question_id.to_string()))?;

        tracing::debug!(%question_id, favorite, "Toggled favorite");
        self.notify(StoreChange::Favorites);
        Ok(favorite)
    }

    async fn add_favorite(&self, question_id: Uuid) -> Result<()> {
        self.set_favorite(question_id, true).await.map(|_| ())
    }

    async fn remove_favorite(&self, question_id: Uuid) -> Result<()> {
        self.set_favorite(question_id, false).await.map(|_| ())
    }

    async fn get_favorite_questions(&self) -> Result<Vec<Question>> {
        self.query_questions(schema::SELECT_FAVORITE_QUESTIONS).await
    }
}

// ============================================================================
// QuizResultStore implementation
// ============================================================================

#[async_trait]
impl QuizResultStore for SqliteStore {
    async fn save_quiz_result(&self, record: &QuizRecord, retention: usize) -> Result<usize> {
        let id_str = record.id.to_string();
        let timestamp = datetime_to_millis(&record.timestamp);
        let category_id = record.category.id;
        let category_name = record.category.name.clone();
        let category_icon = record.category_icon.clone();
        let score = record.score;
        let total_questions = record.total_questions;
        let keep = i64::try_from(retention.max(1)).unwrap_or(i64::MAX);

        let answers = record
            .answers
            .iter()
            .enumerate()
            .map(|(position, answer)| {
                Ok(AnswerParams {
                    position: index_to_sql(position)?,
                    question: QuestionParams::from_question(&answer.question)?,
                    choices: string_list_to_json(&answer.choices)?,
                    selected_index: index_to_sql(answer.selected_index)?,
                    correct_index: index_to_sql(answer.correct_index)?,
                    is_correct: answer.is_correct,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let pruned = self
            .conn
            .call({
                let id_str = id_str.clone();
                move |conn| {
                    let tx = conn
                        .transaction_with_behavior(TransactionBehavior::Immediate)
                        .map_err(wrap_err)?;
                    tx.execute(
                        schema::INSERT_QUIZ_RESULT,
                        params![
                            id_str,
                            timestamp,
                            category_id,
                            category_name,
                            category_icon,
                            score,
                            total_questions,
                        ],
                    )
                    .map_err(wrap_err)?;
                    {
                        let mut stmt = tx.prepare(schema::INSERT_QUIZ_ANSWER).map_err(wrap_err)?;
                        for answer in &answers {
                            stmt.execute(params![
                                id_str,
                                answer.position,
                                answer.question.id,
                                answer.question.question,
                                answer.question.correct_answer,
                                answer.question.incorrect_answers,
                                answer.question.category,
                                answer.question.kind,
                                answer.choices,
                                answer.selected_index,
                                answer.correct_index,
                                answer.is_correct,
                            ])
                            .map_err(wrap_err)?;
                        }
                    }
                    let pruned = tx
                        .execute(schema::PRUNE_QUIZ_RESULTS, [keep])
                        .map_err(wrap_err)?;
                    tx.commit().map_err(wrap_err)?;
                    Ok(pruned)
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "QuizRecord", id_str))?;

        tracing::info!(
            record_id = %record.id,
            score = record.score,
            total = record.total_questions,
            pruned,
            "Saved quiz result"
        );
        self.notify(StoreChange::QuizResults);
        Ok(pruned)
    }

    async fn get_quiz_results(&self, limit: usize) -> Result<Vec<QuizRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.conn
            .call(move |conn| {
                let mut records = {
                    let mut stmt = conn.prepare(schema::SELECT_QUIZ_RESULTS).map_err(wrap_err)?;
                    let rows = stmt
                        .query_map([limit], row_to_quiz_record)
                        .map_err(wrap_err)?;

                    let mut records = Vec::new();
                    for row_result in rows {
                        records.push(row_result.map_err(wrap_err)?);
                    }
                    records
                };

                let mut stmt = conn.prepare(schema::SELECT_QUIZ_ANSWERS).map_err(wrap_err)?;
                for record in &mut records {
                    let rows = stmt
                        .query_map([record.id.to_string()], row_to_quiz_answer)
                        .map_err(wrap_err)?;
                    for row_result in rows {
                        record.answers.push(row_result.map_err(wrap_err)?);
                    }
                }
                Ok(records)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "QuizRecord"))
    }

    async fn get_latest_quiz_result(&self) -> Result<Option<QuizRecord>> {
        Ok(self.get_quiz_results(1).await?.into_iter().next())
    }

    async fn count_quiz_results(&self) -> Result<u64> {
        self.count(schema::COUNT_QUIZ_RESULTS, "QuizRecord").await
    }

    async fn clear_quiz_results(&self) -> Result<()> {
        let removed = self
            .conn
            .call(|conn| {
                conn.execute(schema::DELETE_ALL_QUIZ_RESULTS, [])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "QuizRecord"))?;

        tracing::info!(removed, "Cleared quiz history");
        self.notify(StoreChange::QuizResults);
        Ok(())
    }
}

impl StoreWatch for SqliteStore {
    fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};
    use trivia_core::question::Category;
    use trivia_core::quiz::QuizAnswer;

    use super::*;

    fn question(text: &str) -> Question {
        Question::new(
            text,
            "Right",
            vec!["Wrong A".to_string(), "Wrong B".to_string(), "Wrong C".to_string()],
            "General Knowledge",
            "multiple",
        )
        .unwrap()
    }

    fn record_at(minute: u32, answers: Vec<QuizAnswer>) -> QuizRecord {
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap();
        let total = answers.len() as u32;
        QuizRecord::new(Category::general_knowledge(), total, answers, timestamp)
    }

    fn answered(text: &str, selected: usize) -> QuizAnswer {
        let q = question(text);
        let choices = vec![
            "Wrong B".to_string(),
            "Right".to_string(),
            "Wrong A".to_string(),
            "Wrong C".to_string(),
        ];
        QuizAnswer::new(q, choices, selected).unwrap()
    }

    async fn store() -> SqliteStore {
        SqliteStore::open_in_memory().await.unwrap()
    }

    // ========================================================================
    // Questions
    // ========================================================================

    #[tokio::test]
    async fn test_insert_and_get_question_round_trip() {
        let store = store().await;
        let q = question("What is the capital of France?");

        store.insert_questions(std::slice::from_ref(&q)).await.unwrap();
        let loaded = store.get_question(q.id).await.unwrap().unwrap();

        assert_eq!(loaded, q);
    }

    #[tokio::test]
    async fn test_get_missing_question_is_none() {
        let store = store().await;

        assert!(store.get_question(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_with_latest_fields() {
        let store = store().await;
        let original = question("Which planet is red?");
        let mut updated = original.clone();
        updated.incorrect_answers = vec!["Venus".to_string(), "Jupiter".to_string(), "Saturn".to_string()];
        updated.kind = "boolean".to_string();

        store.insert_questions(&[original.clone()]).await.unwrap();
        store.insert_questions(&[updated.clone()]).await.unwrap();

        assert_eq!(store.count_questions().await.unwrap(), 1);
        assert_eq!(store.get_question(original.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_upsert_preserves_favorite() {
        let store = store().await;
        let q = question("Which ocean is largest?");

        store.insert_questions(&[q.clone()]).await.unwrap();
        store.toggle_favorite(q.id).await.unwrap();
        store.insert_questions(&[q.clone()]).await.unwrap();

        assert!(store.is_favorite(q.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_all_questions_newest_first() {
        let store = store().await;
        let first = question("First?");
        let second = question("Second?");
        let third = question("Third?");

        store.insert_questions(&[first.clone(), second.clone()]).await.unwrap();
        store.insert_questions(&[third.clone()]).await.unwrap();

        let ids: Vec<Uuid> = store
            .get_all_questions()
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_search_is_case_sensitive_substring() {
        let store = store().await;
        store
            .insert_questions(&[
                question("Which cat is the largest?"),
                question("Name a CAT breed"),
                question("What is a dog?"),
                question("Scatter plots show what?"),
            ])
            .await
            .unwrap();

        let results = store.search_questions("cat").await.unwrap();

        let texts: Vec<&str> = results.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["Scatter plots show what?", "Which cat is the largest?"]);
    }

    #[tokio::test]
    async fn test_search_caps_results_newest_first() {
        let store = store().await;
        let questions: Vec<Question> = (0..25).map(|i| question(&format!("cat #{i}"))).collect();
        store.insert_questions(&questions).await.unwrap();

        let results = store.search_questions("cat").await.unwrap();

        assert_eq!(results.len(), SEARCH_LIMIT);
        assert_eq!(results[0].question, "cat #24");
        assert_eq!(results[SEARCH_LIMIT - 1].question, "cat #5");
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let store = store().await;
        store
            .insert_questions(&[question("100% sure?"), question("Fully sure?")])
            .await
            .unwrap();

        let results = store.search_questions("%").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question, "100% sure?");
    }

    #[tokio::test]
    async fn test_clear_questions_cascades_to_favorites() {
        let store = store().await;
        let q = question("Who wrote Hamlet?");
        store.insert_questions(&[q.clone()]).await.unwrap();
        store.toggle_favorite(q.id).await.unwrap();

        store.clear_questions().await.unwrap();

        assert_eq!(store.count_questions().await.unwrap(), 0);
        assert!(!store.is_favorite(q.id).await.unwrap());
        assert!(store.get_favorite_questions().await.unwrap().is_empty());
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    #[tokio::test]
    async fn test_toggle_favorite_twice() {
        let store = store().await;
        let q = question("How many legs does a spider have?");
        store.insert_questions(&[q.clone()]).await.unwrap();

        assert!(store.toggle_favorite(q.id).await.unwrap());
        assert!(store.get_question(q.id).await.unwrap().unwrap().is_favorite);
        assert!(!store.toggle_favorite(q.id).await.unwrap());
        assert!(!store.is_favorite(q.id).await.unwrap());
        assert!(store.get_favorite_questions().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_toggles_are_serialized() {
        let store = Arc::new(store().await);
        let q = question("Which planet has the most moons?");
        store.insert_questions(&[q.clone()]).await.unwrap();

        let first = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.toggle_favorite(q.id).await }
        });
        let second = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.toggle_favorite(q.id).await }
        });
        let (first, second) = tokio::join!(first, second);

        let mut states = vec![first.unwrap().unwrap(), second.unwrap().unwrap()];
        states.sort();
        assert_eq!(states, vec![false, true]);
        assert!(!store.is_favorite(q.id).await.unwrap());
        assert!(store.get_favorite_questions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_missing_question_is_not_found() {
        let store = store().await;
        let id = Uuid::new_v4();

        let err = store.toggle_favorite(id).await.unwrap_err();

        assert_eq!(
            err,
            RepositoryError::NotFound {
                entity_type: "Question",
                id: id.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_add_and_remove_favorite_are_idempotent() {
        let store = store().await;
        let q = question("What is H2O?");
        store.insert_questions(&[q.clone()]).await.unwrap();

        store.add_favorite(q.id).await.unwrap();
        store.add_favorite(q.id).await.unwrap();
        let favorites = store.get_favorite_questions().await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert!(favorites[0].is_favorite);

        store.remove_favorite(q.id).await.unwrap();
        store.remove_favorite(q.id).await.unwrap();
        assert!(store.get_favorite_questions().await.unwrap().is_empty());
    }

    // ========================================================================
    // Quiz results
    // ========================================================================

    #[tokio::test]
    async fn test_quiz_answers_round_trip() {
        let store = store().await;
        let record = record_at(0, vec![answered("Q1?", 1), answered("Q2?", 3)]);

        store.save_quiz_result(&record, 10).await.unwrap();
        let loaded = store.get_latest_quiz_result().await.unwrap().unwrap();

        assert_eq!(loaded, record);
        assert_eq!(loaded.answers[0].selected_index, 1);
        assert_eq!(loaded.answers[0].correct_index, 1);
        assert!(loaded.answers[0].is_correct);
        assert_eq!(loaded.answers[1].selected_index, 3);
        assert!(!loaded.answers[1].is_correct);
        assert_eq!(loaded.score, 1);
    }

    #[tokio::test]
    async fn test_retention_keeps_newest_records() {
        let store = store().await;
        let records: Vec<QuizRecord> = (0..12).map(|m| record_at(m, vec![answered("Q?", 0)])).collect();

        let mut pruned = 0;
        for record in &records {
            pruned += store.save_quiz_result(record, 10).await.unwrap();
        }

        assert_eq!(pruned, 2);
        assert_eq!(store.count_quiz_results().await.unwrap(), 10);
        let kept: Vec<Uuid> = store
            .get_quiz_results(100)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        let expected: Vec<Uuid> = records.iter().rev().take(10).map(|r| r.id).collect();
        assert_eq!(kept, expected);
    }

    #[tokio::test]
    async fn test_pruning_uses_timestamp_not_insert_order() {
        let store = store().await;
        let newer = record_at(30, vec![]);
        let older = record_at(5, vec![]);

        store.save_quiz_result(&newer, 1).await.unwrap();
        store.save_quiz_result(&older, 1).await.unwrap();

        let kept = store.get_quiz_results(10).await.unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_duplicate_record_is_already_exists() {
        let store = store().await;
        let record = record_at(0, vec![]);
        store.save_quiz_result(&record, 10).await.unwrap();

        let err = store.save_quiz_result(&record, 10).await.unwrap_err();

        assert_eq!(
            err,
            RepositoryError::AlreadyExists {
                entity_type: "QuizRecord",
                id: record.id.to_string(),
            }
        );
        assert_eq!(store.count_quiz_results().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_quiz_results_removes_answers() {
        let store = store().await;
        store
            .save_quiz_result(&record_at(0, vec![answered("Q?", 1)]), 10)
            .await
            .unwrap();

        store.clear_quiz_results().await.unwrap();

        assert_eq!(store.count_quiz_results().await.unwrap(), 0);
        assert!(store.get_latest_quiz_result().await.unwrap().is_none());
        let orphans: i64 = store
            .conn
            .call(|conn| {
                conn.query_row("SELECT COUNT(*) FROM quiz_answers", [], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_history_survives_question_cache_clear() {
        let store = store().await;
        let answer = answered("Q?", 1);
        store.insert_questions(&[answer.question.clone()]).await.unwrap();
        let record = record_at(0, vec![answer]);
        store.save_quiz_result(&record, 10).await.unwrap();

        store.clear_questions().await.unwrap();

        assert_eq!(store.get_latest_quiz_result().await.unwrap().unwrap(), record);
    }

    #[tokio::test]
    async fn test_get_quiz_results_respects_limit() {
        let store = store().await;
        for minute in 0..3 {
            store.save_quiz_result(&record_at(minute, vec![]), 10).await.unwrap();
        }

        assert_eq!(store.get_quiz_results(2).await.unwrap().len(), 2);
    }

    // ========================================================================
    // Change notifications
    // ========================================================================

    #[tokio::test]
    async fn test_writes_publish_changes() {
        let store = store().await;
        let mut changes = store.subscribe_changes();
        let q = question("Q?");

        store.insert_questions(&[q.clone()]).await.unwrap();
        store.toggle_favorite(q.id).await.unwrap();
        store.save_quiz_result(&record_at(0, vec![]), 10).await.unwrap();

        assert_eq!(changes.recv().await.unwrap(), StoreChange::Questions);
        assert_eq!(changes.recv().await.unwrap(), StoreChange::Favorites);
        assert_eq!(changes.recv().await.unwrap(), StoreChange::QuizResults);
    }

    #[tokio::test]
    async fn test_failed_write_publishes_nothing() {
        let store = store().await;
        let mut changes = store.subscribe_changes();

        assert!(store.toggle_favorite(Uuid::new_v4()).await.is_err());

        assert!(matches!(
            changes.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trivia.db");
        let path = path.to_str().unwrap();
        let q = question("Persistent?");

        {
            let store = SqliteStore::open(path).await.unwrap();
            store.insert_questions(&[q.clone()]).await.unwrap();
            store.toggle_favorite(q.id).await.unwrap();
        }

        let reopened = SqliteStore::open(path).await.unwrap();
        let loaded = reopened.get_question(q.id).await.unwrap().unwrap();
        assert!(loaded.is_favorite);
        assert_eq!(loaded.question, q.question);
    }

    #[tokio::test]
    async fn test_record_timestamps_keep_millisecond_precision() {
        let store = store().await;
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let record = QuizRecord::new(
            Category::general_knowledge(),
            0,
            vec![],
            base + Duration::milliseconds(1234),
        );

        store.save_quiz_result(&record, 10).await.unwrap();

        let loaded = store.get_latest_quiz_result().await.unwrap().unwrap();
        assert_eq!(loaded.timestamp, record.timestamp);
    }
}
