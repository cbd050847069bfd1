mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::{FavoriteStore, LocalStore, QuestionStore, QuizResultStore, StoreWatch};
pub use types::{
    QueryStream, StoreChange, DEFAULT_RESULT_RETENTION, QUESTION_SCOPE, QUIZ_RESULT_SCOPE,
    SEARCH_LIMIT,
};
