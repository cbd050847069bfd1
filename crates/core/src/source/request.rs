use serde::{Deserialize, Serialize};

use crate::question::Difficulty;

use super::error::SourceError;

/// Most questions the trivia API returns per request.
pub const MAX_QUESTIONS_PER_REQUEST: u8 = 50;

/// Parameters for a question fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub amount: u8,
    pub category: Option<u32>,
    pub difficulty: Difficulty,
}

impl QuestionRequest {
    /// Creates a request, rejecting amounts outside `1..=50`.
    pub fn new(
        amount: u8,
        category: Option<u32>,
        difficulty: Difficulty,
    ) -> Result<Self, SourceError> {
        if amount == 0 || amount > MAX_QUESTIONS_PER_REQUEST {
            return Err(SourceError::InvalidRequest(format!(
                "amount must be between 1 and {MAX_QUESTIONS_PER_REQUEST}, got {amount}"
            )));
        }
        Ok(Self {
            amount,
            category,
            difficulty,
        })
    }
}
