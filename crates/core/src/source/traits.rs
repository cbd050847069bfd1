use async_trait::async_trait;

use crate::question::{Category, Question};

use super::{QuestionRequest, SourceError};

/// Remote source of trivia questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetches a batch of questions in a single request.
    async fn fetch_questions(&self, request: &QuestionRequest) -> Result<Vec<Question>, SourceError>;

    /// Fetches the category list.
    async fn fetch_categories(&self) -> Result<Vec<Category>, SourceError>;
}
