use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{ParseDifficultyError, QuestionError};

/// Namespace for content-derived question identifiers.
const QUESTION_NAMESPACE: Uuid = Uuid::from_u128(0x6c1d_f3a2_9b47_4e0a_8f25_3d9e_71c4_b806);

/// Separator between hashed fields; cannot appear in API text.
const ID_FIELD_SEPARATOR: char = '\u{1f}';

/// A trivia question with its candidate answers.
///
/// The upstream API provides no identifier, so `id` is derived from the
/// question content (see [`Question::content_id`]). Fetching the same
/// question twice yields the same id, which keeps favorites and history
/// attached across fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub category: String,
    /// Question type label as reported by the API (e.g. `multiple`).
    pub kind: String,
    /// Populated from the favorites relation on reads; never stored on the question row.
    #[serde(default)]
    pub is_favorite: bool,
}

impl Question {
    /// Creates a validated question.
    ///
    /// The candidate set (correct + incorrect) must contain exactly one entry
    /// equal to the correct answer.
    pub fn new(
        question: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: Vec<String>,
        category: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let question = question.into();
        let correct_answer = correct_answer.into();
        let category = category.into();

        if question.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer);
        }
        if incorrect_answers.is_empty() {
            return Err(QuestionError::NoIncorrectAnswers);
        }
        if incorrect_answers.contains(&correct_answer) {
            return Err(QuestionError::DuplicateCorrectAnswer(correct_answer));
        }

        Ok(Self {
            id: Self::content_id(&question, &category, &correct_answer),
            question,
            correct_answer,
            incorrect_answers,
            category,
            kind: kind.into(),
            is_favorite: false,
        })
    }

    /// Derives a stable identifier from the question text, category and correct answer.
    pub fn content_id(question: &str, category: &str, correct_answer: &str) -> Uuid {
        let key = format!("{category}{ID_FIELD_SEPARATOR}{question}{ID_FIELD_SEPARATOR}{correct_answer}");
        Uuid::new_v5(&QUESTION_NAMESPACE, key.as_bytes())
    }

    /// Sets a specific ID for this question (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Marks the question as favorited or not.
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Returns the candidate answers: the correct answer first, then the incorrect ones.
    pub fn answers(&self) -> Vec<String> {
        std::iter::once(self.correct_answer.clone())
            .chain(self.incorrect_answers.iter().cloned())
            .collect()
    }

    /// Returns the candidate answers in random order.
    pub fn shuffled_answers<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut answers = self.answers();
        answers.shuffle(rng);
        answers
    }

    /// Returns true if `answer` is the correct answer.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

/// Question difficulty accepted by the trivia API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Returns the wire form used in API query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ParseDifficultyError(other.to_string())),
        }
    }
}
