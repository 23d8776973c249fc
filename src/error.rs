//! Error types for path monitoring.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for path-monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors that can occur while listing, filtering or persisting monitors.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Directory missing or not enumerable at listing time.
    #[error("cannot enumerate {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A glob or regex element that does not compile.
    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Settings store not found or unreadable.
    #[error("settings unavailable: {0}")]
    SettingsUnavailable(String),

    /// More instances requested than the family can hold.
    #[error("instance count {requested} exceeds the maximum of {max}")]
    MaxInstancesExceeded { requested: usize, max: usize },

    /// A path the user asked to watch does not exist.
    #[error("path not found or inaccessible: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A per-instance value that would corrupt a comma-joined field.
    #[error("value '{0}' contains the reserved ',' delimiter")]
    InvalidFieldValue(String),

    /// Change notifier error.
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    /// Wrap an IO failure that happened while enumerating `path`.
    pub fn enumeration(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Enumeration {
            path: path.into(),
            source,
        }
    }
}
