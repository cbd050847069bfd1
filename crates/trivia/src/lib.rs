//! trivia - offline-first trivia data layer.
//!
//! Wires the `trivia_client` HTTP source to a SQLite cache behind
//! [`repository::TriviaRepository`], with use cases and a CLI on top.

pub mod cli;
pub mod config;
pub mod output;
pub mod play;
pub mod repository;
pub mod storage;
pub mod usecase;

pub use config::Config;
pub use repository::TriviaRepository;
pub use storage::SqliteStore;
