use thiserror::Error;

/// Errors that can occur when constructing a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("Question text cannot be empty")]
    EmptyText,
    #[error("Correct answer cannot be empty")]
    EmptyCorrectAnswer,
    #[error("Question needs at least one incorrect answer")]
    NoIncorrectAnswers,
    #[error("Correct answer also listed as incorrect: {0}")]
    DuplicateCorrectAnswer(String),
}

/// Errors that can occur when parsing a difficulty label.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown difficulty: {0} (expected easy, medium or hard)")]
pub struct ParseDifficultyError(pub String);
