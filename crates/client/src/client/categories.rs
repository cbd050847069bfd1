//! Category API operations.

use serde::Deserialize;
use trivia_core::question::Category;

use super::TriviaClient;
use crate::error::Result;

/// Envelope of `GET /api_category.php`.
#[derive(Debug, Deserialize)]
struct CategoryResponse {
    trivia_categories: Vec<ApiCategory>,
}

#[derive(Debug, Deserialize)]
struct ApiCategory {
    id: u32,
    name: String,
}

impl TriviaClient {
    /// List all categories known to the API.
    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        tracing::debug!("Requesting categories");
        let response = self
            .client
            .get(self.url("/api_category.php"))
            .send()
            .await?;
        let body: CategoryResponse = self.handle_response(response).await?;

        Ok(body
            .trivia_categories
            .into_iter()
            .map(|c| Category::new(c.id, c.name))
            .collect())
    }
}
