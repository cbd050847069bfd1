use thiserror::Error;

/// Errors that can occur while running a quiz session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("A quiz needs at least one question")]
    NoQuestions,
    #[error("Answer index {index} out of range ({choices} choices)")]
    InvalidAnswerIndex { index: usize, choices: usize },
    #[error("Quiz is already finished")]
    AlreadyFinished,
    #[error("Quiz is not finished: {answered} of {total} questions answered")]
    NotFinished { answered: usize, total: usize },
}
