use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::question::{Category, Question};

/// One answered question within a quiz.
///
/// `choices` is the order the answers were presented in; both indices point
/// into it, so the record can be replayed exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub question: Question,
    pub choices: Vec<String>,
    pub selected_index: usize,
    pub correct_index: usize,
    pub is_correct: bool,
}

impl QuizAnswer {
    /// Records the selection of `selected_index` among `choices`.
    ///
    /// Returns `None` if the index is out of range or the correct answer is
    /// not among the choices.
    pub fn new(question: Question, choices: Vec<String>, selected_index: usize) -> Option<Self> {
        let correct_index = choices.iter().position(|c| question.is_correct(c))?;
        if selected_index >= choices.len() {
            return None;
        }
        Some(Self {
            question,
            choices,
            selected_index,
            correct_index,
            is_correct: selected_index == correct_index,
        })
    }

    pub fn selected_answer(&self) -> Option<&str> {
        self.choices.get(self.selected_index).map(String::as_str)
    }
}

/// A completed quiz as persisted in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: Category,
    pub category_icon: String,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<QuizAnswer>,
}

impl QuizRecord {
    /// Builds a record from answered questions, computing the score.
    pub fn new(
        category: Category,
        total_questions: u32,
        answers: Vec<QuizAnswer>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let score = answers.iter().filter(|a| a.is_correct).count() as u32;
        Self {
            id: Uuid::new_v4(),
            timestamp,
            category_icon: category.icon().to_string(),
            category,
            score,
            total_questions,
            answers,
        }
    }

    /// Sets a specific ID for this record (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Score as a whole percentage of the total, rounded down.
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        self.score * 100 / self.total_questions
    }

    pub fn incorrect_count(&self) -> u32 {
        self.total_questions.saturating_sub(self.score)
    }
}
