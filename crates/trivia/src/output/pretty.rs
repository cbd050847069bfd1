//! Pretty output formatting.

use trivia_core::question::{Category, Question};
use trivia_core::quiz::QuizRecord;

use super::Statistics;

fn header(title: &str, count: usize) -> String {
    let mut output = format!("{title} ({count})\n");
    output.push_str(&"-".repeat(40));
    output
}

/// Format a question for display.
pub fn format_question(question: &Question) -> String {
    let star = if question.is_favorite { " *" } else { "" };
    let mut output = format!(
        "{}{}\n  ID: {}\n  Category: {}\n  Answer: {}",
        question.question, star, question.id, question.category, question.correct_answer
    );
    output.push_str(&format!(
        "\n  Other choices: {}",
        question.incorrect_answers.join(", ")
    ));
    output
}

/// Format questions for display under `title`.
pub fn format_questions(title: &str, questions: &[Question]) -> String {
    if questions.is_empty() {
        return "No questions found.".to_string();
    }
    let mut output = header(title, questions.len());
    for question in questions {
        output.push_str(&format!("\n{}", format_question(question)));
        output.push('\n');
    }
    output
}

/// Format categories for display.
pub fn format_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }
    let mut output = header("CATEGORIES", categories.len());
    for category in categories {
        output.push_str(&format!("\n{:>4}  {}", category.id, category.name));
    }
    output
}

/// Format a quiz record for display.
pub fn format_record(record: &QuizRecord) -> String {
    format!(
        "{} [{}] {}/{} ({}%)\n  ID: {}\n  Played: {}",
        record.category.name,
        record.category_icon,
        record.score,
        record.total_questions,
        record.percentage(),
        record.id,
        record.timestamp.format("%Y-%m-%d %H:%M")
    )
}

/// Format quiz history for display.
pub fn format_records(records: &[QuizRecord]) -> String {
    if records.is_empty() {
        return "No quizzes played yet.".to_string();
    }
    let mut output = header("HISTORY", records.len());
    for record in records {
        output.push_str(&format!("\n{}", format_record(record)));
        output.push('\n');
    }
    output
}

pub fn format_statistics(stats: &Statistics) -> String {
    let percent = |value: Option<u32>| value.map_or_else(|| "-".to_string(), |p| format!("{p}%"));
    format!(
        "STATISTICS\n{}\n  Cached questions: {}\n  Favorites: {}\n  Quizzes played: {}\n  Average score: {}\n  Best score: {}",
        "-".repeat(40),
        stats.cached_questions,
        stats.favorite_questions,
        stats.quizzes_played,
        percent(stats.average_percentage),
        percent(stats.best_percentage),
    )
}
