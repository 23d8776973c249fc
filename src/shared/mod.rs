//! Utilities shared across modules

pub mod patterns;

pub use patterns::{PATTERN_DELIMITER, glob_to_regex, split_patterns};
