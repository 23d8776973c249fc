//! Core filter traits for directory listings
//!
//! Kind-based checks and pattern-based checks are separate pieces; a policy
//! composes them by calling the pattern predicate explicitly.

use crate::lister::DirectoryEntry;

/// Decision for whether to keep or drop a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Keep the entry in the listing
    Keep,
    /// Drop the entry with a reason
    Skip(&'static str),
}

impl FilterDecision {
    pub fn is_keep(self) -> bool {
        matches!(self, FilterDecision::Keep)
    }
}

/// Capability interface for anything that can filter directory entries
pub trait FilterPolicy {
    /// Decide what to do with a single entry
    fn decide(&self, entry: &DirectoryEntry) -> FilterDecision;

    /// Get the name of this filter for debugging/logging
    fn name(&self) -> &'static str;

    /// Returns true if the entry survives every active criterion
    fn passes_filter(&self, entry: &DirectoryEntry) -> bool {
        self.decide(entry).is_keep()
    }
}
