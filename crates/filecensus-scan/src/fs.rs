//! Directory-listing boundary used by both passes.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// Directory/file discriminator for a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory to recurse into.
    Directory,
    /// Anything else (regular files, symlinks, special files).
    File,
}

/// One entry returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    /// Entry name (not full path).
    pub name: OsString,
    /// Whether the entry is a directory.
    pub kind: EntryKind,
}

impl ListedEntry {
    /// Create a directory entry.
    pub fn dir(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Create a file entry.
    pub fn file(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Read-only view of a filesystem.
///
/// Implementations must be callable from many worker threads at once.
pub trait DirLister: Send + Sync {
    /// List the entries of a directory.
    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>>;

    /// Size in bytes of a file.
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Check whether a path exists and is a directory.
    fn is_dir(&self, path: &Path) -> io::Result<bool>;
}

/// [`DirLister`] backed by the local filesystem.
///
/// Symbolic links are never followed: they are listed as files and sized
/// by the link itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirLister for FsLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let kind = if entry.file_type()?.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(ListedEntry {
                name: entry.file_name(),
                kind,
            });
        }
        Ok(entries)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        fs::symlink_metadata(path).map(|m| m.len())
    }

    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        fs::metadata(path).map(|m| m.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_lister_lists_kinds_and_sizes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();

        let lister = FsLister;
        let mut entries = lister.list(temp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries, vec![ListedEntry::file("a.txt"), ListedEntry::dir("sub")]);
        assert_eq!(lister.file_size(&temp.path().join("a.txt")).unwrap(), 5);
        assert!(lister.is_dir(temp.path()).unwrap());
        assert!(!lister.is_dir(&temp.path().join("a.txt")).unwrap());
    }

    #[test]
    fn test_fs_lister_missing_dir() {
        let temp = TempDir::new().unwrap();
        let err = FsLister.list(&temp.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
