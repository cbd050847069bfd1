//! Local storage: the SQLite store and reactive queries over it.

pub mod sqlite;
mod watch;

pub use sqlite::SqliteStore;
pub use watch::watch_query;
