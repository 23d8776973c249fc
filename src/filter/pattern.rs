//! Name pattern matching for the exclude filter
//!
//! A [`PatternSet`] is the pattern half of the exclude filter: a list of
//! compiled, case-insensitive regexes OR-combined against an entry name.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::{MonitorError, Result};
use crate::shared::{glob_to_regex, split_patterns};

/// Source of the implicit pattern that hides editor backup files (`notes.txt~`)
pub const DOC_TEMP_PATTERN: &str = "~$";

static DOC_TEMP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DOC_TEMP_PATTERN).expect("backup-file pattern is a valid regex"));

/// Compiled exclude patterns
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    user: Vec<Regex>,
    doc_temp: bool,
}

impl PatternSet {
    /// Compile comma-separated pattern text.
    ///
    /// Glob elements are translated with [`glob_to_regex`]; full-regex elements
    /// are used verbatim. Compilation stops at the first bad element.
    pub fn compile(text: &str, full_regex: bool, hide_doc_temp: bool) -> Result<Self> {
        let mut user = Vec::new();

        for element in split_patterns(text) {
            let source = if full_regex {
                element.to_string()
            } else {
                glob_to_regex(element)
            };

            let regex = RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map_err(|source| MonitorError::InvalidPattern {
                    pattern: element.to_string(),
                    source,
                })?;
            user.push(regex);
        }

        Ok(Self {
            user,
            doc_temp: hide_doc_temp,
        })
    }

    /// Returns true if `name` matches any pattern
    pub fn matches(&self, name: &str) -> bool {
        if self.doc_temp && DOC_TEMP_REGEX.is_match(name) {
            return true;
        }
        self.user.iter().any(|re| re.is_match(name))
    }

    /// Add or remove the implicit backup-file pattern
    pub fn set_doc_temp(&mut self, hide_doc_temp: bool) {
        self.doc_temp = hide_doc_temp;
    }

    /// Regex sources in check order, the implicit pattern last
    pub fn sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self.user.iter().map(Regex::as_str).collect();
        if self.doc_temp {
            sources.push(DOC_TEMP_PATTERN);
        }
        sources
    }

    pub fn len(&self) -> usize {
        self.user.len() + usize::from(self.doc_temp)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_patterns_match_exactly() {
        for literal in ["notes", "README", "a b", "x+y", "(draft)"] {
            let set = PatternSet::compile(literal, false, false).unwrap();
            assert!(set.matches(literal), "{literal} should match itself");
            assert!(!set.matches(&format!("{literal}x")), "{literal}x should not match");
        }
    }

    #[test]
    fn test_glob_star() {
        let set = PatternSet::compile("a*", false, false).unwrap();
        assert!(set.matches("apple"));
        assert!(set.matches("a"));
        assert!(!set.matches("banana"));
    }

    #[test]
    fn test_glob_dot_is_literal() {
        let set = PatternSet::compile("*.log", false, false).unwrap();
        assert!(set.matches("server.log"));
        assert!(!set.matches("serverxlog"));
    }

    #[test]
    fn test_case_insensitive() {
        let set = PatternSet::compile("*.JPG", false, false).unwrap();
        assert!(set.matches("holiday.jpg"));
        assert!(set.matches("HOLIDAY.JPG"));
    }

    #[test]
    fn test_full_regex_is_verbatim() {
        let set = PatternSet::compile(r"^\d+\.txt$", true, false).unwrap();
        assert!(set.matches("2024.txt"));
        assert!(!set.matches("notes.txt"));

        // no anchors means search semantics
        let set = PatternSet::compile("draft", true, false).unwrap();
        assert!(set.matches("my-draft-v2"));
    }

    #[test]
    fn test_invalid_regex_names_element() {
        let err = PatternSet::compile("ok*, [unclosed", true, false).unwrap_err();
        match err {
            MonitorError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "[unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_doc_temp_pattern() {
        let mut set = PatternSet::compile("", false, true).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.matches("notes.txt~"));
        assert!(!set.matches("notes.txt"));
        assert_eq!(set.sources(), vec![DOC_TEMP_PATTERN]);

        set.set_doc_temp(false);
        assert!(set.is_empty());
        assert!(!set.matches("notes.txt~"));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = PatternSet::default();
        assert!(!set.matches("anything"));
        assert!(!set.matches(""));
    }
}
