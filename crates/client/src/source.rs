use async_trait::async_trait;
use trivia_core::question::{Category, Question};
use trivia_core::source::{QuestionRequest, QuestionSource, SourceError};

use crate::TriviaClient;

#[async_trait]
impl QuestionSource for TriviaClient {
    async fn fetch_questions(&self, request: &QuestionRequest) -> Result<Vec<Question>, SourceError> {
        self.get_questions(request).await.map_err(SourceError::from)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, SourceError> {
        self.get_categories().await.map_err(SourceError::from)
    }
}
