//! Persisted per-instance settings
//!
//! All instances of the monitor family share one [`SettingsStore`]. Each
//! persisted key holds one comma-joined value with a field per instance:
//!
//! ```text
//! watchedpaths = "/home/me/notes,/tmp,/srv/share"
//! excludeFlags = "6,7"        # instance 2 has no flags yet -> defaults
//! ```
//!
//! The field count of [`PATH_KEY`] is the number of instances. Values cannot
//! contain a comma.

pub mod codec;
pub mod store;

use std::sync::Arc;

use crate::error::Result;

pub use codec::{decode_field, encode_field, field_count};
pub use store::{FileSettings, MemorySettings, SettingsStore};

/// Key holding the watched directory of every instance
pub const PATH_KEY: &str = "watchedpaths";

/// Key holding the exclude flag bitmask of every instance
pub const EXCLUDE_FLAGS_KEY: &str = "excludeFlags";

/// One instance's slot in one multi-instance key
#[derive(Clone)]
pub struct InstanceField {
    store: Arc<dyn SettingsStore>,
    key: &'static str,
    index: usize,
}

impl InstanceField {
    pub fn new(store: Arc<dyn SettingsStore>, key: &'static str, index: usize) -> Self {
        Self { store, key, index }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read this instance's value; `None` if the stored value is too short
    pub fn get(&self) -> Result<Option<String>> {
        let raw = self.store.get_string(self.key)?;
        Ok(decode_field(&raw, self.index).map(str::to_string))
    }

    /// Read-modify-write this instance's value.
    ///
    /// Not atomic: two instances writing the same key at once can lose an update.
    pub fn set(&self, value: &str) -> Result<()> {
        let raw = self.store.get_string(self.key)?;
        let updated = encode_field(&raw, self.index, value)?;
        tracing::debug!(
            "Storing new setting {}: old={:?} new={:?}",
            self.key,
            raw,
            updated
        );
        self.store.set_string(self.key, &updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_fields_share_one_key() -> Result<()> {
        let store: Arc<dyn SettingsStore> =
            Arc::new(MemorySettings::with_values([(PATH_KEY, "/a,/b,/c")]));
        let first = InstanceField::new(store.clone(), PATH_KEY, 0);
        let last = InstanceField::new(store.clone(), PATH_KEY, 2);

        assert_eq!(first.get()?.as_deref(), Some("/a"));
        last.set("/z")?;
        assert_eq!(store.get_string(PATH_KEY)?, "/a,/b,/z");
        assert_eq!(first.get()?.as_deref(), Some("/a"));
        Ok(())
    }

    #[test]
    fn test_short_key_reads_absent() -> Result<()> {
        let store: Arc<dyn SettingsStore> =
            Arc::new(MemorySettings::with_values([(EXCLUDE_FLAGS_KEY, "6")]));
        let field = InstanceField::new(store.clone(), EXCLUDE_FLAGS_KEY, 2);

        assert_eq!(field.get()?, None);
        field.set("15")?;
        assert_eq!(store.get_string(EXCLUDE_FLAGS_KEY)?, "6,,15");
        Ok(())
    }
}
