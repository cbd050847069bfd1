//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use trivia_core::question::{Category, Question};
use trivia_core::quiz::{QuizAnswer, QuizRecord};
use trivia_core::storage::RepositoryError;
use uuid::Uuid;

// ============================================================================
// Question conversions
// ============================================================================

/// Convert a SQLite row to a Question.
///
/// Expected columns: id, question, correct_answer, incorrect_answers, category, type, is_favorite
pub fn row_to_question(row: &Row) -> rusqlite::Result<Question> {
    let id: String = row.get(0)?;
    let incorrect_answers: String = row.get(3)?;

    Ok(Question {
        id: parse_uuid(0, &id)?,
        question: row.get(1)?,
        correct_answer: row.get(2)?,
        incorrect_answers: parse_string_list(3, &incorrect_answers)?,
        category: row.get(4)?,
        kind: row.get(5)?,
        is_favorite: row.get(6)?,
    })
}

// ============================================================================
// Quiz conversions
// ============================================================================

/// Convert a SQLite row to a QuizRecord without its answers.
///
/// Expected columns: id, timestamp, category_id, category_name, category_icon, score, total_questions
pub fn row_to_quiz_record(row: &Row) -> rusqlite::Result<QuizRecord> {
    let id: String = row.get(0)?;
    let timestamp: i64 = row.get(1)?;

    Ok(QuizRecord {
        id: parse_uuid(0, &id)?,
        timestamp: parse_millis(1, timestamp)?,
        category: Category::new(row.get(2)?, row.get::<_, String>(3)?),
        category_icon: row.get(4)?,
        score: row.get(5)?,
        total_questions: row.get(6)?,
        answers: Vec::new(),
    })
}

/// Convert a SQLite row to a QuizAnswer.
///
/// Expected columns: question_id, question, correct_answer, incorrect_answers,
/// category, type, choices, selected_index, correct_index, is_correct
pub fn row_to_quiz_answer(row: &Row) -> rusqlite::Result<QuizAnswer> {
    let question_id: String = row.get(0)?;
    let incorrect_answers: String = row.get(3)?;
    let choices: String = row.get(6)?;

    let question = Question {
        id: parse_uuid(0, &question_id)?,
        question: row.get(1)?,
        correct_answer: row.get(2)?,
        incorrect_answers: parse_string_list(3, &incorrect_answers)?,
        category: row.get(4)?,
        kind: row.get(5)?,
        is_favorite: false,
    };

    Ok(QuizAnswer {
        question,
        choices: parse_string_list(6, &choices)?,
        selected_index: parse_index(7, row.get(7)?)?,
        correct_index: parse_index(8, row.get(8)?)?,
        is_correct: row.get(9)?,
    })
}

// ============================================================================
// Value conversions
// ============================================================================

/// Serialize a string list for a JSON column.
pub fn string_list_to_json(values: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(values).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

pub fn datetime_to_millis(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

pub fn index_to_sql(index: usize) -> Result<i64, RepositoryError> {
    i64::try_from(index).map_err(|_| RepositoryError::InvalidData(format!("index out of range: {index}")))
}

fn parse_uuid(column: usize, s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn parse_string_list(column: usize, json: &str) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn parse_millis(column: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, millis))
}

fn parse_index(column: usize, value: i64) -> rusqlite::Result<usize> {
    usize::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(column, value))
}
