//! Line-oriented quiz runner.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use trivia_core::question::{Category, Question};
use trivia_core::quiz::{QuizError, QuizRecord, QuizSession};

/// Errors that end an interactive quiz.
#[derive(Debug, Error)]
pub enum PlayError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("Quiz aborted after {answered} answers")]
    Aborted { answered: usize },
}

/// Category a quiz over `questions` is recorded under.
///
/// Ids outside the built-in list take their name from the fetched questions.
/// Without a requested id the quiz counts as general knowledge.
pub fn quiz_category(requested: Option<u32>, questions: &[Question]) -> Category {
    let Some(id) = requested else {
        return Category::general_knowledge();
    };
    Category::find_builtin(id).unwrap_or_else(|| {
        let name = questions
            .first()
            .map(|question| question.category.clone())
            .unwrap_or_default();
        Category::new(id, name)
    })
}

/// Asks every question of `session` on `output`, reading 1-based choices from `input`.
///
/// Invalid input is re-prompted. End of input aborts the quiz without a record.
pub fn run_quiz<R: BufRead, W: Write>(
    mut session: QuizSession,
    input: &mut R,
    output: &mut W,
) -> Result<QuizRecord, PlayError> {
    let total = session.len();

    while let Some((question, choices)) = session.current() {
        let choice_count = choices.len();
        writeln!(
            output,
            "\nQuestion {}/{}: {}",
            session.current_index() + 1,
            total,
            question.question
        )?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(output, "  {}) {}", i + 1, choice)?;
        }

        let index = read_choice(input, output, choice_count, session.current_index())?;
        let answer = session.answer(index)?;
        if answer.is_correct {
            writeln!(output, "Correct!")?;
        } else {
            writeln!(
                output,
                "Wrong, the answer was: {}",
                answer.question.correct_answer
            )?;
        }
    }

    let record = session.finish()?;
    writeln!(
        output,
        "\nFinal score: {}/{} ({}%)",
        record.score,
        record.total_questions,
        record.percentage()
    )?;
    Ok(record)
}

/// Reads until a number in `1..=choices` is entered; returns it 0-based.
fn read_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    choices: usize,
    answered: usize,
) -> Result<usize, PlayError> {
    let mut line = String::new();
    loop {
        write!(output, "Your answer: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(PlayError::Aborted { answered });
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=choices).contains(&n) => return Ok(n - 1),
            _ => writeln!(output, "Enter a number between 1 and {choices}.")?,
        }
    }
}
