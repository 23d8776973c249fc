//! Comma-joined multi-instance field codec
//!
//! Several logical instances share one string setting; instance `i` owns the
//! `i`-th comma-separated field. The codec knows nothing about which setting
//! it is working on.

use crate::error::{MonitorError, Result};
use crate::shared::PATTERN_DELIMITER;

/// Number of instance slots in a raw value. An empty value still has one slot.
pub fn field_count(raw: &str) -> usize {
    raw.split(PATTERN_DELIMITER).count()
}

/// Extract the value owned by `index`, or `None` if the raw value is too short
pub fn decode_field(raw: &str, index: usize) -> Option<&str> {
    raw.split(PATTERN_DELIMITER).nth(index)
}

/// Replace the value owned by `index` and return the new raw value.
///
/// Fields past the current end are created as empty placeholders, so the
/// result always has at least `index + 1` fields. Other fields keep their
/// order and content.
pub fn encode_field(raw: &str, index: usize, value: &str) -> Result<String> {
    if value.contains(PATTERN_DELIMITER) {
        return Err(MonitorError::InvalidFieldValue(value.to_string()));
    }

    let mut fields: Vec<&str> = raw.split(PATTERN_DELIMITER).collect();
    if index >= fields.len() {
        fields.resize(index + 1, "");
    }
    fields[index] = value;

    Ok(fields.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_field() {
        assert_eq!(decode_field("/tmp,/home", 0), Some("/tmp"));
        assert_eq!(decode_field("/tmp,/home", 1), Some("/home"));
        assert_eq!(decode_field("/tmp,/home", 2), None);
        assert_eq!(decode_field("", 0), Some(""));
        assert_eq!(decode_field("a,,c", 1), Some(""));
    }

    #[test]
    fn test_encode_then_decode() {
        let raw = encode_field("a,b,c", 1, "X").unwrap();
        assert_eq!(raw, "a,X,c");
        assert_eq!(decode_field(&raw, 0), Some("a"));
        assert_eq!(decode_field(&raw, 1), Some("X"));
        assert_eq!(decode_field(&raw, 2), Some("c"));
    }

    #[test]
    fn test_encode_is_idempotent() {
        let once = encode_field("a,b,c", 2, "/srv/share").unwrap();
        let twice = encode_field(&once, 2, "/srv/share").unwrap();
        assert_eq!(once, twice);
        assert_eq!(decode_field(&twice, 2), Some("/srv/share"));
    }

    #[test]
    fn test_encode_replaces_without_residue() {
        let long = encode_field("a,b", 0, "/a/very/long/path").unwrap();
        let short = encode_field(&long, 0, "/x").unwrap();
        assert_eq!(short, "/x,b");
    }

    #[test]
    fn test_encode_extends_with_placeholders() {
        let raw = encode_field("a", 3, "d").unwrap();
        assert_eq!(raw, "a,,,d");
        assert_eq!(field_count(&raw), 4);
        assert_eq!(decode_field(&raw, 3), Some("d"));

        assert_eq!(encode_field("", 1, "b").unwrap(), ",b");
    }

    #[test]
    fn test_encode_rejects_delimiter() {
        assert!(matches!(
            encode_field("a,b", 0, "x,y"),
            Err(MonitorError::InvalidFieldValue(v)) if v == "x,y"
        ));
    }

    #[test]
    fn test_field_count() {
        assert_eq!(field_count(""), 1);
        assert_eq!(field_count("/tmp"), 1);
        assert_eq!(field_count("/tmp,/home,/srv"), 3);
    }
}
