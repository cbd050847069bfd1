//! JSON output formatting.

use serde::Serialize;

/// Format a value as compact JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Format a value as indented JSON.
pub fn format_json_pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
