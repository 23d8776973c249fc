//! Pattern text utilities
//!
//! Helpers shared by the exclude filter and the CLI for turning the
//! user-facing pattern text into regular expression sources.

/// Delimiter between patterns in user input and between per-instance values
/// in persisted settings. It cannot be escaped.
pub const PATTERN_DELIMITER: char = ',';

/// Split comma-separated pattern text into trimmed, non-empty elements
pub fn split_patterns(text: &str) -> Vec<&str> {
    text.split(PATTERN_DELIMITER)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Translate a simple glob into an anchored regex source.
///
/// Only `*` is a wildcard (any sequence, including the empty one). Every
/// other character, `.` included, is matched literally.
pub fn glob_to_regex(pattern: &str) -> String {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    format!("^{}$", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_to_regex() {
        assert_eq!(glob_to_regex("a*"), "^a.*$");
        assert_eq!(glob_to_regex("*.txt"), r"^.*\.txt$");
        assert_eq!(glob_to_regex("notes"), "^notes$");
        assert_eq!(glob_to_regex("*"), "^.*$");
        // `?` and classes are literal
        assert_eq!(glob_to_regex("a?[b]"), r"^a\?\[b\]$");
    }

    #[test]
    fn test_split_patterns() {
        assert_eq!(split_patterns("a*, *.log ,b"), vec!["a*", "*.log", "b"]);
        assert_eq!(split_patterns("a,,b"), vec!["a", "b"]);
        assert!(split_patterns("").is_empty());
        assert!(split_patterns(" , ").is_empty());
    }
}
