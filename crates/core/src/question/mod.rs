mod category;
mod error;
mod types;

pub use category::Category;
pub use error::{ParseDifficultyError, QuestionError};
pub use types::{Difficulty, Question};
