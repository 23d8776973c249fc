//! Visibility toggles as a persisted bitmask

use bitflags::bitflags;

bitflags! {
    /// Visibility toggles of an exclude policy.
    ///
    /// Stored per instance as a decimal number in the `excludeFlags` setting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExcludeFlags: u8 {
        const SHOW_HIDDEN = 0x1;
        const SHOW_DIRECTORIES = 0x2;
        const SHOW_SYMLINKS = 0x4;
        const SHOW_DOC_TEMP = 0x8;
    }
}

impl Default for ExcludeFlags {
    fn default() -> Self {
        ExcludeFlags::SHOW_DIRECTORIES | ExcludeFlags::SHOW_SYMLINKS
    }
}

impl ExcludeFlags {
    /// Parse a stored field. Unknown bits are dropped; anything unparsable
    /// falls back to the defaults.
    pub fn decode(field: Option<&str>) -> Self {
        match field.map(str::trim).filter(|f| !f.is_empty()) {
            Some(raw) => match raw.parse::<u8>() {
                Ok(bits) => ExcludeFlags::from_bits_truncate(bits),
                Err(_) => {
                    tracing::warn!("Ignoring malformed exclude flags '{}', using defaults", raw);
                    ExcludeFlags::default()
                }
            },
            None => ExcludeFlags::default(),
        }
    }

    pub fn encode(self) -> String {
        self.bits().to_string()
    }
}
