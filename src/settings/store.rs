//! Key-value settings stores
//!
//! The monitor family shares one store. Every key holds a single string;
//! multi-instance values are packed into it with the field codec.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{MonitorError, Result};

/// Process-wide string settings shared by all instances
pub trait SettingsStore: Send + Sync {
    /// Read a key. Unset keys read as the empty string.
    fn get_string(&self, key: &str) -> Result<String>;

    /// Write a key
    fn set_string(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store, used when no persistent store can be found
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `values`
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(values.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn get_string(&self, key: &str) -> Result<String> {
        let values = self
            .values
            .read()
            .map_err(|_| MonitorError::SettingsUnavailable("settings lock poisoned".to_string()))?;
        Ok(values.get(key).cloned().unwrap_or_default())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| MonitorError::SettingsUnavailable("settings lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as a flat TOML table of strings
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileSettings {
    /// Open the store at `path`. A missing file reads as empty and is created
    /// on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                MonitorError::SettingsUnavailable(format!("cannot read {}: {}", path.display(), e))
            })?;
            toml::from_str(&content).map_err(|e| {
                MonitorError::SettingsUnavailable(format!("cannot parse {}: {}", path.display(), e))
            })?
        } else {
            tracing::debug!("No settings file at {}, starting empty", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Open the first existing settings file among `primary` and `fallback`
    pub fn discover(primary: &Path, fallback: &Path) -> Result<Self> {
        for candidate in [primary, fallback] {
            if candidate.is_file() {
                tracing::debug!("Using settings file {}", candidate.display());
                return Self::open(candidate);
            }
            tracing::debug!("Could not find settings at {}", candidate.display());
        }

        Err(MonitorError::SettingsUnavailable(format!(
            "no settings file at {} or {}",
            primary.display(),
            fallback.display()
        )))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }
        let content = toml::to_string(values).map_err(|e| self.write_error(e))?;
        fs::write(&self.path, content).map_err(|e| self.write_error(e))?;
        Ok(())
    }

    fn write_error(&self, e: impl std::fmt::Display) -> MonitorError {
        MonitorError::SettingsUnavailable(format!("cannot write {}: {}", self.path.display(), e))
    }
}

impl SettingsStore for FileSettings {
    fn get_string(&self, key: &str) -> Result<String> {
        let values = self
            .values
            .read()
            .map_err(|_| MonitorError::SettingsUnavailable("settings lock poisoned".to_string()))?;
        Ok(values.get(key).cloned().unwrap_or_default())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| MonitorError::SettingsUnavailable("settings lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_settings() -> Result<()> {
        let store = MemorySettings::with_values([("watchedpaths", "/tmp,/home")]);
        assert_eq!(store.get_string("watchedpaths")?, "/tmp,/home");
        assert_eq!(store.get_string("excludeFlags")?, "");

        store.set_string("excludeFlags", "6,7")?;
        assert_eq!(store.get_string("excludeFlags")?, "6,7");
        Ok(())
    }

    #[test]
    fn test_file_settings_persist_across_opens() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("settings.toml");

        let store = FileSettings::open(&path)?;
        assert_eq!(store.get_string("watchedpaths")?, "");
        store.set_string("watchedpaths", "/tmp,/srv")?;
        assert!(path.exists());

        let reopened = FileSettings::open(&path)?;
        assert_eq!(reopened.get_string("watchedpaths")?, "/tmp,/srv");
        Ok(())
    }

    #[test]
    fn test_file_settings_unparsable() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "watchedpaths = [not toml")?;

        assert!(matches!(FileSettings::open(&path), Err(MonitorError::SettingsUnavailable(_))));
        Ok(())
    }

    #[test]
    fn test_discover_prefers_primary_then_fallback() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let primary = temp_dir.path().join("primary.toml");
        let fallback = temp_dir.path().join("fallback.toml");

        assert!(matches!(
            FileSettings::discover(&primary, &fallback),
            Err(MonitorError::SettingsUnavailable(_))
        ));

        fs::write(&fallback, "watchedpaths = \"/fallback\"\n")?;
        let store = FileSettings::discover(&primary, &fallback)?;
        assert_eq!(store.path(), fallback.as_path());

        fs::write(&primary, "watchedpaths = \"/primary\"\n")?;
        let store = FileSettings::discover(&primary, &fallback)?;
        assert_eq!(store.get_string("watchedpaths")?, "/primary");
        Ok(())
    }
}
