mod error;
mod fetch_state;
mod request;
mod traits;

pub use error::{api_code_description, SourceError};
pub use fetch_state::{fetch_questions_stream, FetchState};
pub use request::{QuestionRequest, MAX_QUESTIONS_PER_REQUEST};
pub use traits::QuestionSource;
