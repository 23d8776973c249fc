//! Runtime configuration for path-monitor
//!
//! Values are layered with figment (see [`core`]) and extracted into
//! [`MonitorConfig`]. Per-monitor state such as watched paths lives in the
//! settings store, not here.

pub mod core;
pub mod smart_load;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::filter::ExcludeFlags;
use crate::instance::SpawnSchedule;
use crate::lister::DEFAULT_MAX_ENTRIES;

pub use smart_load::ConfigFormat;

/// Merged configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub listing: ListingConfig,
    pub filter: FilterConfig,
    pub spawn: SpawnSchedule,
    pub settings: SettingsConfig,
}

/// Menu listing options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Maximum entries per menu
    pub max_entries: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Exclude options shared by every monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Comma separated exclude patterns
    pub exclude: String,

    /// Use patterns as regular expressions instead of globs
    pub full_regex: bool,

    pub show_hidden: bool,
    pub show_directories: bool,
    pub show_symlinks: bool,
    pub show_doc_temp: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let flags = ExcludeFlags::default();
        Self {
            exclude: String::new(),
            full_regex: false,
            show_hidden: flags.contains(ExcludeFlags::SHOW_HIDDEN),
            show_directories: flags.contains(ExcludeFlags::SHOW_DIRECTORIES),
            show_symlinks: flags.contains(ExcludeFlags::SHOW_SYMLINKS),
            show_doc_temp: flags.contains(ExcludeFlags::SHOW_DOC_TEMP),
        }
    }
}

impl FilterConfig {
    /// Visibility toggles as a flags value
    pub fn flags(&self) -> ExcludeFlags {
        let mut flags = ExcludeFlags::empty();
        flags.set(ExcludeFlags::SHOW_HIDDEN, self.show_hidden);
        flags.set(ExcludeFlags::SHOW_DIRECTORIES, self.show_directories);
        flags.set(ExcludeFlags::SHOW_SYMLINKS, self.show_symlinks);
        flags.set(ExcludeFlags::SHOW_DOC_TEMP, self.show_doc_temp);
        flags
    }
}

/// Location of the persisted settings store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Settings file; empty for the default location
    pub file: String,

    /// Location tried when `file` does not exist; empty for the default
    pub fallback: String,
}

impl SettingsConfig {
    pub fn primary_path(&self) -> PathBuf {
        if self.file.is_empty() {
            home_dir().join(".config/path-monitor/settings.toml")
        } else {
            PathBuf::from(&self.file)
        }
    }

    pub fn fallback_path(&self) -> PathBuf {
        if self.fallback.is_empty() {
            home_dir().join(".local/share/path-monitor/settings.toml")
        } else {
            PathBuf::from(&self.fallback)
        }
    }
}

pub(crate) fn home_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home),
        Err(_) => PathBuf::from("~"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_flags_round_trip_defaults() {
        let filter = FilterConfig::default();
        assert_eq!(filter.flags(), ExcludeFlags::default());
        assert!(!filter.show_hidden);
        assert!(filter.show_directories);
    }

    #[test]
    fn test_settings_paths() {
        let custom = SettingsConfig {
            file: "/srv/monitor.toml".to_string(),
            fallback: String::new(),
        };
        assert_eq!(custom.primary_path(), PathBuf::from("/srv/monitor.toml"));
        assert!(custom.fallback_path().ends_with(".local/share/path-monitor/settings.toml"));
        assert!(
            SettingsConfig::default()
                .primary_path()
                .ends_with(".config/path-monitor/settings.toml")
        );
    }
}
