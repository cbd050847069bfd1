//! SQLite storage backend.
//!
//! Uses `rusqlite` for the statements and `tokio-rusqlite` to run them off
//! the async runtime.

mod conversions;
mod error;
mod schema;
mod store;

pub use store::SqliteStore;
