//! Exclude filtering for directory listings
//!
//! This module decides which directory entries are shown. Filtering combines
//! visibility toggles (hidden files, directories, symlinks, backup files) with
//! user-supplied glob or regex patterns.

pub mod flags;
pub mod pattern;
pub mod policy;
pub mod traits;

pub use flags::ExcludeFlags;
pub use pattern::{DOC_TEMP_PATTERN, PatternSet};
pub use policy::ExcludePolicy;
pub use traits::{FilterDecision, FilterPolicy};
