//! Output formatting functions.

pub mod json;
pub mod pretty;

use serde::Serialize;
use trivia_core::quiz::QuizRecord;

use crate::cli::OutputFormat;

/// Format a value for output.
pub fn format_output<T: Serialize>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => json::format_json_pretty(value),
    }
}

/// Summary shown by `trivia stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub cached_questions: u64,
    pub favorite_questions: usize,
    pub quizzes_played: usize,
    pub average_percentage: Option<u32>,
    pub best_percentage: Option<u32>,
}

impl Statistics {
    pub fn new(cached_questions: u64, favorite_questions: usize, history: &[QuizRecord]) -> Self {
        let percentages: Vec<u32> = history.iter().map(QuizRecord::percentage).collect();
        let average_percentage = (!percentages.is_empty())
            .then(|| percentages.iter().sum::<u32>() / percentages.len() as u32);

        Self {
            cached_questions,
            favorite_questions,
            quizzes_played: history.len(),
            average_percentage,
            best_percentage: percentages.iter().copied().max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use trivia_core::question::Category;

    use super::*;

    fn record(score: u32, total: u32) -> QuizRecord {
        let mut record = QuizRecord::new(Category::general_knowledge(), total, vec![], Utc::now());
        record.score = score;
        record
    }

    #[test]
    fn test_statistics_without_history() {
        let stats = Statistics::new(12, 3, &[]);

        assert_eq!(stats.quizzes_played, 0);
        assert_eq!(stats.average_percentage, None);
        assert_eq!(stats.best_percentage, None);
    }

    #[test]
    fn test_statistics_percentages() {
        let stats = Statistics::new(0, 0, &[record(5, 10), record(10, 10), record(0, 10)]);

        assert_eq!(stats.quizzes_played, 3);
        assert_eq!(stats.average_percentage, Some(50));
        assert_eq!(stats.best_percentage, Some(100));
    }

    #[test]
    fn test_format_output_json_is_compact() {
        let stats = Statistics::new(1, 0, &[]);

        let json = format_output(&stats, OutputFormat::Json);

        assert!(json.starts_with("{\"cached_questions\":1,"));
    }
}
