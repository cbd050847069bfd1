//! Quiz session state machine.
//!
//! Walks a fetched question list one question at a time, recording each
//! answer and the running score. Pure: the caller decides when to persist
//! the finished record.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::question::{Category, Question};

use super::error::QuizError;
use super::types::{QuizAnswer, QuizRecord};

/// An in-progress quiz over a fixed list of questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    category: Category,
    questions: Vec<Question>,
    choices: Vec<Vec<String>>,
    answers: Vec<QuizAnswer>,
}

impl QuizSession {
    /// Starts a session presenting each question's answers in [`Question::answers`] order.
    pub fn new(category: Category, questions: Vec<Question>) -> Result<Self, QuizError> {
        let choices = questions.iter().map(Question::answers).collect();
        Self::with_choices(category, questions, choices)
    }

    /// Starts a session with every question's answers shuffled.
    pub fn shuffled<R: Rng + ?Sized>(
        category: Category,
        questions: Vec<Question>,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        let choices = questions.iter().map(|q| q.shuffled_answers(rng)).collect();
        Self::with_choices(category, questions, choices)
    }

    fn with_choices(
        category: Category,
        questions: Vec<Question>,
        choices: Vec<Vec<String>>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self {
            category,
            answers: Vec::with_capacity(questions.len()),
            questions,
            choices,
        })
    }

    /// Returns the current question and its choices, or `None` once finished.
    pub fn current(&self) -> Option<(&Question, &[String])> {
        let index = self.answers.len();
        let question = self.questions.get(index)?;
        Some((question, self.choices[index].as_slice()))
    }

    /// Zero-based position of the current question.
    pub fn current_index(&self) -> usize {
        self.answers.len()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn score(&self) -> u32 {
        self.answers.iter().filter(|a| a.is_correct).count() as u32
    }

    pub fn is_finished(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    pub fn answers(&self) -> &[QuizAnswer] {
        &self.answers
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Answers the current question with the choice at `index` and advances.
    pub fn answer(&mut self, index: usize) -> Result<&QuizAnswer, QuizError> {
        let position = self.answers.len();
        let (question, choices) = match self.current() {
            Some((question, choices)) => (question.clone(), choices.to_vec()),
            None => return Err(QuizError::AlreadyFinished),
        };

        let choice_count = choices.len();
        let answer = QuizAnswer::new(question, choices, index).ok_or(
            QuizError::InvalidAnswerIndex {
                index,
                choices: choice_count,
            },
        )?;

        self.answers.push(answer);
        Ok(&self.answers[position])
    }

    /// Consumes a finished session into a record timestamped now.
    pub fn finish(self) -> Result<QuizRecord, QuizError> {
        self.finish_at(Utc::now())
    }

    /// Consumes a finished session into a record with the given timestamp.
    pub fn finish_at(self, timestamp: DateTime<Utc>) -> Result<QuizRecord, QuizError> {
        if !self.is_finished() {
            return Err(QuizError::NotFinished {
                answered: self.answers.len(),
                total: self.questions.len(),
            });
        }
        let total = self.questions.len() as u32;
        Ok(QuizRecord::new(self.category, total, self.answers, timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn questions() -> Vec<Question> {
        vec![
            Question::new(
                "Largest planet?",
                "Jupiter",
                vec!["Mars".to_string(), "Venus".to_string()],
                "Science & Nature",
                "multiple",
            )
            .unwrap(),
            Question::new(
                "Smallest prime?",
                "2",
                vec!["1".to_string(), "3".to_string()],
                "Science: Mathematics",
                "multiple",
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_empty_session_is_rejected() {
        let result = QuizSession::new(Category::general_knowledge(), vec![]);
        assert!(matches!(result, Err(QuizError::NoQuestions)));
    }

    #[test]
    fn test_full_session_produces_record() {
        let mut session = QuizSession::new(Category::general_knowledge(), questions()).unwrap();

        // Correct answer is first in unshuffled order
        assert!(session.answer(0).unwrap().is_correct);
        assert_eq!(session.current_index(), 1);
        assert!(!session.answer(2).unwrap().is_correct);
        assert!(session.is_finished());
        assert!(session.current().is_none());

        let record = session.finish().unwrap();
        assert_eq!(record.score, 1);
        assert_eq!(record.total_questions, 2);
        assert_eq!(record.answers.len(), 2);
        assert_eq!(record.answers[1].selected_index, 2);
        assert_eq!(record.answers[1].correct_index, 0);
    }

    #[test]
    fn test_answer_out_of_range() {
        let mut session = QuizSession::new(Category::general_knowledge(), questions()).unwrap();
        let result = session.answer(3);
        assert_eq!(
            result.unwrap_err(),
            QuizError::InvalidAnswerIndex {
                index: 3,
                choices: 3
            }
        );
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_answer_after_finish() {
        let mut session = QuizSession::new(Category::general_knowledge(), questions()).unwrap();
        session.answer(0).unwrap();
        session.answer(0).unwrap();
        assert_eq!(session.answer(0).unwrap_err(), QuizError::AlreadyFinished);
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn test_finish_before_last_question() {
        let mut session = QuizSession::new(Category::general_knowledge(), questions()).unwrap();
        session.answer(1).unwrap();
        assert_eq!(
            session.finish().unwrap_err(),
            QuizError::NotFinished {
                answered: 1,
                total: 2
            }
        );
    }

    #[test]
    fn test_shuffled_session_scores_by_content() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut session =
            QuizSession::shuffled(Category::general_knowledge(), questions(), &mut rng).unwrap();

        while let Some((question, choices)) = session.current() {
            let correct = choices
                .iter()
                .position(|c| question.is_correct(c))
                .unwrap();
            session.answer(correct).unwrap();
        }

        assert_eq!(session.score(), 2);
    }
}
