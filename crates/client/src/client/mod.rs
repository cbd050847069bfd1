//! HTTP client for the Open Trivia DB API.

pub mod categories;
pub mod questions;

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default base URL of the public trivia API.
pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";

/// HTTP client for the trivia API.
///
/// Every call is a single attempt; failures are returned to the caller
/// without retrying.
#[derive(Debug, Clone)]
pub struct TriviaClient {
    client: reqwest::Client,
    base_url: String,
}

impl TriviaClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a JSON body, mapping non-2xx and empty bodies to errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.trim().is_empty())
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ClientError::EmptyBody {
                status: status.as_u16(),
            });
        }
        serde_json::from_str(&body).map_err(ClientError::from)
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = TriviaClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api.php"), "http://localhost:8080/api.php");
    }

    #[test]
    fn test_with_timeout_builds() {
        let client = TriviaClient::with_timeout(DEFAULT_BASE_URL, Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }
}
