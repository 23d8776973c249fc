//! Filtered, capped directory listings
//!
//! The lister re-enumerates a directory from scratch on every call, runs each
//! child through a [`FilterPolicy`] and stops once enough entries have been
//! accepted. Enumeration order is the platform's; nothing is sorted.

pub mod entry;
pub mod enumerator;

use std::path::Path;

use crate::error::Result;
use crate::filter::{FilterDecision, FilterPolicy};

pub use entry::{DirectoryEntry, EntryKind, MenuEntry};
pub use enumerator::{DirectoryEnumerator, EntryIter, FsEnumerator};

/// Default cap on listing length, sized to keep a dropdown on screen
pub const DEFAULT_MAX_ENTRIES: usize = 25;

/// Lists directory children that pass a filter policy
pub struct DirectoryLister<E = FsEnumerator> {
    enumerator: E,
    max_entries: usize,
}

impl Default for DirectoryLister {
    fn default() -> Self {
        Self::new(FsEnumerator)
    }
}

impl<E: DirectoryEnumerator> DirectoryLister<E> {
    pub fn new(enumerator: E) -> Self {
        Self {
            enumerator,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Set the listing cap
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// List names under `path` that pass `policy`, propagating enumeration failures
    pub fn try_list<P: FilterPolicy + ?Sized>(
        &self,
        path: &Path,
        policy: &P,
    ) -> Result<Vec<String>> {
        let entries = self.try_collect(path, policy)?;
        Ok(entries.into_iter().map(|entry| entry.name).collect())
    }

    /// List names under `path` that pass `policy`.
    ///
    /// Failures are logged and yield an empty listing.
    pub fn list<P: FilterPolicy + ?Sized>(&self, path: &Path, policy: &P) -> Vec<String> {
        self.collect(path, policy)
            .into_iter()
            .map(|entry| entry.name)
            .collect()
    }

    /// List entries under `path` as `(display name, full path)` pairs for a menu.
    ///
    /// The path is joined from the raw file name, so names that are not valid
    /// UTF-8 still point at the right file.
    pub fn list_entries<P: FilterPolicy + ?Sized>(
        &self,
        path: &Path,
        policy: &P,
    ) -> Vec<MenuEntry> {
        self.collect(path, policy)
            .into_iter()
            .map(|entry| MenuEntry {
                path: path.join(&entry.file_name),
                display_name: entry.name,
            })
            .collect()
    }

    fn collect<P: FilterPolicy + ?Sized>(&self, path: &Path, policy: &P) -> Vec<DirectoryEntry> {
        match self.try_collect(path, policy) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Showing empty listing: {}", e);
                Vec::new()
            }
        }
    }

    fn try_collect<P: FilterPolicy + ?Sized>(
        &self,
        path: &Path,
        policy: &P,
    ) -> Result<Vec<DirectoryEntry>> {
        let mut accepted = Vec::new();
        if self.max_entries == 0 {
            return Ok(accepted);
        }

        for entry in self.enumerator.enumerate(path)? {
            let entry = entry?;
            match policy.decide(&entry) {
                FilterDecision::Keep => {
                    accepted.push(entry);
                    if accepted.len() >= self.max_entries {
                        tracing::debug!(
                            "Listing of {} capped at {} entries",
                            path.display(),
                            self.max_entries
                        );
                        break;
                    }
                }
                FilterDecision::Skip(reason) => {
                    tracing::trace!("{} skipped {} ({})", policy.name(), entry.name, reason);
                }
            }
        }

        Ok(accepted)
    }
}
