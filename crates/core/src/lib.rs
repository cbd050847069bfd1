//! trivia_core - domain types and contracts for the trivia data layer.
//!
//! Everything in this crate is pure: no network, no database. The HTTP
//! source lives in `trivia_client` and the SQLite store in `trivia`.

pub mod error;
pub mod question;
pub mod quiz;
pub mod source;
pub mod storage;

pub use error::TriviaError;
