use crate::error::Result;
use crate::lister::{DirectoryEntry, EntryKind};

use super::flags::ExcludeFlags;
use super::pattern::PatternSet;
use super::traits::{FilterDecision, FilterPolicy};

/// Exclude Policy - kind-based and pattern-based entry filtering
///
/// Responsibilities:
/// - Hide symlinks, directories and hidden files according to the toggles
/// - Hide names matching the user's exclude patterns
/// - Keep the implicit backup-file pattern in place while doc-temp files are hidden
///
/// An entry is kept only if it clears every active criterion. Reconfiguring is
/// all-or-nothing: a rejected pattern leaves the previous policy untouched.
#[derive(Debug, Clone)]
pub struct ExcludePolicy {
    patterns: PatternSet,
    pattern_text: String,
    full_regex: bool,
    show_hidden_files: bool,
    show_directories: bool,
    show_symlinks: bool,
    show_doc_temp_files: bool,
}

impl Default for ExcludePolicy {
    fn default() -> Self {
        Self::from_flags(ExcludeFlags::default())
    }
}

impl ExcludePolicy {
    /// Create a policy with no user patterns and the given toggles
    pub fn from_flags(flags: ExcludeFlags) -> Self {
        let show_doc_temp_files = flags.contains(ExcludeFlags::SHOW_DOC_TEMP);
        let mut patterns = PatternSet::default();
        patterns.set_doc_temp(!show_doc_temp_files);

        Self {
            patterns,
            pattern_text: String::new(),
            full_regex: false,
            show_hidden_files: flags.contains(ExcludeFlags::SHOW_HIDDEN),
            show_directories: flags.contains(ExcludeFlags::SHOW_DIRECTORIES),
            show_symlinks: flags.contains(ExcludeFlags::SHOW_SYMLINKS),
            show_doc_temp_files,
        }
    }

    /// Recompile the exclude patterns from comma-separated text
    pub fn configure(&mut self, pattern: &str, full_regex: bool) -> Result<()> {
        let patterns = match PatternSet::compile(pattern, full_regex, !self.show_doc_temp_files) {
            Ok(patterns) => patterns,
            Err(e) => {
                tracing::warn!("Keeping previous exclude filter: {}", e);
                return Err(e);
            }
        };

        self.patterns = patterns;
        self.pattern_text = pattern.to_string();
        self.full_regex = full_regex;
        tracing::debug!("Exclude filter set up, patterns={:?}", self.patterns.sources());
        Ok(())
    }

    /// Returns true if `name` matches any exclude pattern
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.matches(name)
    }

    pub fn toggle_hidden_files(&mut self) {
        self.show_hidden_files = !self.show_hidden_files;
    }

    pub fn toggle_directories(&mut self) {
        self.show_directories = !self.show_directories;
    }

    pub fn toggle_symlinks(&mut self) {
        self.show_symlinks = !self.show_symlinks;
    }

    /// Flip backup-file visibility, adding or removing the implicit pattern
    pub fn toggle_doc_temp_files(&mut self) {
        self.show_doc_temp_files = !self.show_doc_temp_files;
        self.patterns.set_doc_temp(!self.show_doc_temp_files);
        tracing::debug!("Exclude filter set up, patterns={:?}", self.patterns.sources());
    }

    /// Current toggles as a persistable bitmask
    pub fn flags(&self) -> ExcludeFlags {
        let mut flags = ExcludeFlags::empty();
        flags.set(ExcludeFlags::SHOW_HIDDEN, self.show_hidden_files);
        flags.set(ExcludeFlags::SHOW_DIRECTORIES, self.show_directories);
        flags.set(ExcludeFlags::SHOW_SYMLINKS, self.show_symlinks);
        flags.set(ExcludeFlags::SHOW_DOC_TEMP, self.show_doc_temp_files);
        flags
    }

    /// Replace all toggles at once, keeping the user patterns
    pub fn apply_flags(&mut self, flags: ExcludeFlags) {
        self.show_hidden_files = flags.contains(ExcludeFlags::SHOW_HIDDEN);
        self.show_directories = flags.contains(ExcludeFlags::SHOW_DIRECTORIES);
        self.show_symlinks = flags.contains(ExcludeFlags::SHOW_SYMLINKS);
        self.show_doc_temp_files = flags.contains(ExcludeFlags::SHOW_DOC_TEMP);
        self.patterns.set_doc_temp(!self.show_doc_temp_files);
    }

    pub fn show_hidden_files(&self) -> bool {
        self.show_hidden_files
    }

    pub fn show_directories(&self) -> bool {
        self.show_directories
    }

    pub fn show_symlinks(&self) -> bool {
        self.show_symlinks
    }

    pub fn show_doc_temp_files(&self) -> bool {
        self.show_doc_temp_files
    }

    /// Last accepted pattern text, for restoring an edit that was cancelled
    pub fn pattern_text(&self) -> &str {
        &self.pattern_text
    }

    pub fn is_full_regex(&self) -> bool {
        self.full_regex
    }

    /// Compiled regex sources, implicit pattern included
    pub fn pattern_sources(&self) -> Vec<&str> {
        self.patterns.sources()
    }
}

impl FilterPolicy for ExcludePolicy {
    fn decide(&self, entry: &DirectoryEntry) -> FilterDecision {
        if entry.is_symlink && !self.show_symlinks {
            return FilterDecision::Skip("symlink");
        }
        if entry.kind == EntryKind::Directory && !self.show_directories {
            return FilterDecision::Skip("directory");
        }
        if entry.is_hidden && !self.show_hidden_files {
            return FilterDecision::Skip("hidden");
        }
        if self.matches(&entry.name) {
            return FilterDecision::Skip("pattern");
        }
        FilterDecision::Keep
    }

    fn name(&self) -> &'static str {
        "exclude-policy"
    }
}
