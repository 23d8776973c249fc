use std::fs;
use std::path::Path;

use crate::error::{MonitorError, Result};

use super::entry::{DirectoryEntry, EntryKind};

/// Lazily produced children of a directory
pub type EntryIter<'a> = Box<dyn Iterator<Item = Result<DirectoryEntry>> + Send + 'a>;

/// Source of directory children.
///
/// Order is whatever the backing platform yields; callers must not rely on it.
pub trait DirectoryEnumerator: Send + Sync {
    /// Start enumerating `path`. Fails with [`MonitorError::Enumeration`] when
    /// the directory is missing or unreadable.
    fn enumerate<'a>(&'a self, path: &'a Path) -> Result<EntryIter<'a>>;
}

/// Enumerator backed by `std::fs::read_dir`. Symlinks are flagged and
/// classified by what they point to.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsEnumerator;

impl DirectoryEnumerator for FsEnumerator {
    fn enumerate<'a>(&'a self, path: &'a Path) -> Result<EntryIter<'a>> {
        let read_dir = fs::read_dir(path).map_err(|e| MonitorError::enumeration(path, e))?;

        let entries = read_dir.map(move |entry| {
            let entry = entry.map_err(|e| MonitorError::enumeration(path, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| MonitorError::enumeration(entry.path(), e))?;

            if !file_type.is_symlink() {
                let kind = EntryKind::from(file_type);
                return Ok(DirectoryEntry::from_file_name(entry.file_name(), kind, false));
            }

            // classify links by their target; dangling links stay links
            let kind = match fs::metadata(entry.path()) {
                Ok(target) => EntryKind::from(target.file_type()),
                Err(e) => {
                    tracing::trace!("Dangling symlink {}: {}", entry.path().display(), e);
                    EntryKind::SymbolicLink
                }
            };
            Ok(DirectoryEntry::from_file_name(entry.file_name(), kind, true))
        });

        Ok(Box::new(entries))
    }
}
