use std::{env, time::Duration};

use trivia_core::storage::DEFAULT_RESULT_RETENTION;

/// Default trivia API base URL.
pub const DEFAULT_API_URL: &str = "https://opentdb.com";

/// Default SQLite database path.
pub const DEFAULT_DB_PATH: &str = "trivia.db";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Trivia API base URL (default: "https://opentdb.com")
    pub api_url: String,
    /// Path to SQLite database file (default: "trivia.db")
    pub db_path: String,
    /// Maximum number of quiz results kept in history (default: 10)
    pub result_retention: usize,
    /// HTTP request timeout in seconds (default: none)
    pub http_timeout_seconds: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRIVIA_API_URL` - Trivia API base URL (default: "https://opentdb.com")
    /// - `TRIVIA_DB_PATH` - SQLite database path (default: "trivia.db")
    /// - `QUIZ_RESULT_RETENTION` - Quiz history size, at least 1 (default: 10)
    /// - `HTTP_TIMEOUT_SECONDS` - HTTP request timeout (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_url: lookup("TRIVIA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            db_path: lookup("TRIVIA_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            result_retention: lookup("QUIZ_RESULT_RETENTION")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(DEFAULT_RESULT_RETENTION),
            http_timeout_seconds: lookup("HTTP_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .filter(|n: &u64| *n > 0),
        }
    }

    /// Get the HTTP timeout as a Duration, if one is configured.
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.api_url, "https://opentdb.com");
        assert_eq!(config.db_path, "trivia.db");
        assert_eq!(config.result_retention, 10);
        assert_eq!(config.http_timeout(), None);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = config_from(&[
            ("TRIVIA_API_URL", "http://localhost:9000"),
            ("TRIVIA_DB_PATH", "/tmp/quiz.db"),
            ("QUIZ_RESULT_RETENTION", "25"),
            ("HTTP_TIMEOUT_SECONDS", "15"),
        ]);

        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.db_path, "/tmp/quiz.db");
        assert_eq!(config.result_retention, 25);
        assert_eq!(config.http_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[
            ("QUIZ_RESULT_RETENTION", "0"),
            ("HTTP_TIMEOUT_SECONDS", "soon"),
        ]);

        assert_eq!(config.result_retention, DEFAULT_RESULT_RETENTION);
        assert_eq!(config.http_timeout_seconds, None);
    }
}
