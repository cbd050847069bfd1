//! Question API operations.

use serde::{Deserialize, Serialize};
use trivia_core::question::{Difficulty, Question};
use trivia_core::source::QuestionRequest;

use super::TriviaClient;
use crate::error::{ClientError, Result};

/// Only multiple-choice questions are requested.
const QUESTION_TYPE: &str = "multiple";

/// Text fields come back percent-encoded (RFC 3986) so they survive JSON intact.
const ENCODING: &str = "url3986";

#[derive(Debug, Serialize)]
struct QuestionsQuery {
    amount: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<u32>,
    difficulty: Difficulty,
    #[serde(rename = "type")]
    kind: &'static str,
    encode: &'static str,
}

impl From<&QuestionRequest> for QuestionsQuery {
    fn from(request: &QuestionRequest) -> Self {
        Self {
            amount: request.amount,
            category: request.category,
            difficulty: request.difficulty,
            kind: QUESTION_TYPE,
            encode: ENCODING,
        }
    }
}

/// Envelope of `GET /api.php`.
#[derive(Debug, Deserialize)]
struct QuestionResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<ApiQuestion>,
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    #[serde(rename = "type")]
    kind: String,
    category: String,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl ApiQuestion {
    fn into_question(self) -> Result<Question> {
        let incorrect_answers = self
            .incorrect_answers
            .iter()
            .map(|answer| decode_field(answer))
            .collect::<Result<Vec<_>>>()?;

        Question::new(
            decode_field(&self.question)?,
            decode_field(&self.correct_answer)?,
            incorrect_answers,
            decode_field(&self.category)?,
            decode_field(&self.kind)?,
        )
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

fn decode_field(raw: &str) -> Result<String> {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ClientError::InvalidResponse(format!("bad percent-encoding: {e}")))
}

impl TriviaClient {
    /// Fetch a batch of multiple-choice questions.
    pub async fn get_questions(&self, request: &QuestionRequest) -> Result<Vec<Question>> {
        tracing::debug!(
            amount = request.amount,
            category = ?request.category,
            difficulty = %request.difficulty,
            "Requesting questions"
        );
        let response = self
            .client
            .get(self.url("/api.php"))
            .query(&QuestionsQuery::from(request))
            .send()
            .await?;
        let body: QuestionResponse = self.handle_response(response).await?;

        if body.response_code != 0 {
            tracing::warn!(
                code = body.response_code,
                amount = request.amount,
                category = ?request.category,
                "Trivia API rejected question request"
            );
            return Err(ClientError::Api {
                code: body.response_code,
            });
        }

        let questions = body
            .results
            .into_iter()
            .map(ApiQuestion::into_question)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(count = questions.len(), "Fetched questions");
        Ok(questions)
    }
}
