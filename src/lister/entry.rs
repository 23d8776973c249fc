use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;

/// Kind of a directory entry. Symlinks report their target's kind;
/// `SymbolicLink` is left for links whose target cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    RegularFile,
    Directory,
    SymbolicLink,
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::SymbolicLink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::RegularFile
        } else {
            Self::Other
        }
    }
}

/// Read-only view of one child of a watched directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Basename for display and pattern matching, lossily decoded
    pub name: String,
    /// Basename exactly as the filesystem returned it
    pub file_name: OsString,
    pub kind: EntryKind,
    pub is_symlink: bool,
    pub is_hidden: bool,
}

impl DirectoryEntry {
    /// Create an entry; hidden means a leading dot
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        let name = name.into();
        Self::from_file_name(OsString::from(&name), kind, kind == EntryKind::SymbolicLink)
    }

    /// A symlink whose target has kind `target_kind`
    pub fn symlink(name: impl Into<String>, target_kind: EntryKind) -> Self {
        let name = name.into();
        Self::from_file_name(OsString::from(&name), target_kind, true)
    }

    /// Create an entry from a raw filesystem name
    pub fn from_file_name(file_name: OsString, kind: EntryKind, is_symlink: bool) -> Self {
        let name = file_name.to_string_lossy().into_owned();
        let is_hidden = name.starts_with('.');
        Self {
            name,
            file_name,
            kind,
            is_symlink,
            is_hidden,
        }
    }
}

/// One selectable item handed to the menu renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub display_name: String,
    pub path: PathBuf,
}
