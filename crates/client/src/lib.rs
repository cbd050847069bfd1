//! trivia_client - HTTP client for the Open Trivia DB API.

pub mod client;
pub mod error;
mod source;

pub use client::TriviaClient;
pub use error::{ClientError, Result};
