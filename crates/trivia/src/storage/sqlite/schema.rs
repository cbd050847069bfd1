//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Timestamps are stored as Unix milliseconds and
//! string lists as JSON arrays.

/// SQL statement to create all tables.
///
/// `PRAGMA foreign_keys` is per connection, so it runs together with the DDL
/// every time a store is opened.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Cached questions
CREATE TABLE IF NOT EXISTS questions (
    id TEXT PRIMARY KEY,
    question TEXT NOT NULL,
    correct_answer TEXT NOT NULL,
    incorrect_answers TEXT NOT NULL,
    category TEXT NOT NULL,
    type TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    seq INTEGER NOT NULL
);

-- Favorited questions; a row's existence is the favorite flag
CREATE TABLE IF NOT EXISTS favorites (
    question_id TEXT PRIMARY KEY,
    created_at INTEGER NOT NULL,
    FOREIGN KEY (question_id) REFERENCES questions(id) ON DELETE CASCADE
);

-- Completed quizzes
CREATE TABLE IF NOT EXISTS quiz_results (
    id TEXT PRIMARY KEY,
    timestamp INTEGER NOT NULL,
    category_id INTEGER NOT NULL,
    category_name TEXT NOT NULL,
    category_icon TEXT NOT NULL,
    score INTEGER NOT NULL,
    total_questions INTEGER NOT NULL
);

-- Answers of a completed quiz, in the order they were given
CREATE TABLE IF NOT EXISTS quiz_answers (
    result_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    question_id TEXT NOT NULL,
    question TEXT NOT NULL,
    correct_answer TEXT NOT NULL,
    incorrect_answers TEXT NOT NULL,
    category TEXT NOT NULL,
    type TEXT NOT NULL,
    choices TEXT NOT NULL,
    selected_index INTEGER NOT NULL,
    correct_index INTEGER NOT NULL,
    is_correct INTEGER NOT NULL,
    PRIMARY KEY (result_id, position),
    FOREIGN KEY (result_id) REFERENCES quiz_results(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_questions_recent ON questions(created_at, seq);
CREATE INDEX IF NOT EXISTS idx_quiz_results_timestamp ON quiz_results(timestamp);
"#;

// ============================================================================
// Question queries
// ============================================================================

/// Upserts a question. `seq` breaks ties between rows written in the same millisecond.
pub const UPSERT_QUESTION: &str = r#"
INSERT INTO questions (id, question, correct_answer, incorrect_answers, category, type, created_at, seq)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, (SELECT COALESCE(MAX(seq), 0) + 1 FROM questions))
ON CONFLICT(id) DO UPDATE SET
    question = excluded.question,
    correct_answer = excluded.correct_answer,
    incorrect_answers = excluded.incorrect_answers,
    category = excluded.category,
    type = excluded.type,
    created_at = excluded.created_at,
    seq = excluded.seq
"#;

pub const SELECT_QUESTION_BY_ID: &str = r#"
SELECT q.id, q.question, q.correct_answer, q.incorrect_answers, q.category, q.type,
       EXISTS(SELECT 1 FROM favorites f WHERE f.question_id = q.id)
FROM questions q
WHERE q.id = ?1
"#;

pub const SELECT_ALL_QUESTIONS: &str = r#"
SELECT q.id, q.question, q.correct_answer, q.incorrect_answers, q.category, q.type,
       EXISTS(SELECT 1 FROM favorites f WHERE f.question_id = q.id)
FROM questions q
ORDER BY q.created_at DESC, q.seq DESC
"#;

/// Case-sensitive substring match; `instr` treats the needle literally.
pub const SEARCH_QUESTIONS: &str = r#"
SELECT q.id, q.question, q.correct_answer, q.incorrect_answers, q.category, q.type,
       EXISTS(SELECT 1 FROM favorites f WHERE f.question_id = q.id)
FROM questions q
WHERE instr(q.question, ?1) > 0
ORDER BY q.created_at DESC, q.seq DESC
LIMIT ?2
"#;

pub const COUNT_QUESTIONS: &str = "SELECT COUNT(*) FROM questions";

pub const QUESTION_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM questions WHERE id = ?1)";

pub const DELETE_ALL_QUESTIONS: &str = "DELETE FROM questions";

// ============================================================================
// Favorite queries
// ============================================================================

pub const FAVORITE_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM favorites WHERE question_id = ?1)";

pub const INSERT_FAVORITE: &str = r#"
INSERT OR IGNORE INTO favorites (question_id, created_at)
VALUES (?1, ?2)
"#;

pub const DELETE_FAVORITE: &str = "DELETE FROM favorites WHERE question_id = ?1";

pub const SELECT_FAVORITE_QUESTIONS: &str = r#"
SELECT q.id, q.question, q.correct_answer, q.incorrect_answers, q.category, q.type, 1
FROM questions q
INNER JOIN favorites f ON f.question_id = q.id
ORDER BY f.created_at DESC, f.rowid DESC
"#;

// ============================================================================
// Quiz result queries
// ============================================================================

pub const INSERT_QUIZ_RESULT: &str = r#"
INSERT INTO quiz_results (id, timestamp, category_id, category_name, category_icon, score, total_questions)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const INSERT_QUIZ_ANSWER: &str = r#"
INSERT INTO quiz_answers (
    result_id, position, question_id, question, correct_answer, incorrect_answers,
    category, type, choices, selected_index, correct_index, is_correct
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

/// Deletes every record beyond the newest `?1`.
pub const PRUNE_QUIZ_RESULTS: &str = r#"
DELETE FROM quiz_results
WHERE id IN (
    SELECT id FROM quiz_results
    ORDER BY timestamp DESC, rowid DESC
    LIMIT -1 OFFSET ?1
)
"#;

pub const SELECT_QUIZ_RESULTS: &str = r#"
SELECT id, timestamp, category_id, category_name, category_icon, score, total_questions
FROM quiz_results
ORDER BY timestamp DESC, rowid DESC
LIMIT ?1
"#;

pub const SELECT_QUIZ_ANSWERS: &str = r#"
SELECT question_id, question, correct_answer, incorrect_answers, category, type,
       choices, selected_index, correct_index, is_correct
FROM quiz_answers
WHERE result_id = ?1
ORDER BY position
"#;

pub const COUNT_QUIZ_RESULTS: &str = "SELECT COUNT(*) FROM quiz_results";

pub const DELETE_ALL_QUIZ_RESULTS: &str = "DELETE FROM quiz_results";
