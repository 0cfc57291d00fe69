//! File entries read from a single directory level.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::CleanupError;

/// BLAKE3 content hash for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// A regular file observed in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name (lossy UTF-8).
    pub name: CompactString,
    /// Lower-cased final extension without the dot.
    pub extension: Option<CompactString>,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Whether the directory entry is a symbolic link to the file.
    #[serde(default)]
    pub is_symlink: bool,
}

impl FileEntry {
    /// Read an entry from the filesystem.
    ///
    /// Size and modification time are those of the link target for symlinks.
    /// Returns `Ok(None)` if the path exists but is not a regular file.
    pub fn from_path(path: impl Into<PathBuf>) -> std::io::Result<Option<Self>> {
        let path = path.into();
        let is_symlink = fs::symlink_metadata(&path)?.file_type().is_symlink();
        let metadata = fs::metadata(&path)?;
        if !metadata.is_file() {
            return Ok(None);
        }

        let name = path
            .file_name()
            .map(|n| CompactString::from(n.to_string_lossy()))
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| CompactString::from(e.to_string_lossy().to_lowercase()));

        Ok(Some(Self {
            name,
            extension,
            size: metadata.len(),
            modified: metadata.modified()?,
            is_symlink,
            path,
        }))
    }

    /// The extension as a string slice.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }
}

/// List the regular files directly inside `dir`, sorted by path.
///
/// Directories and other non-file entries are skipped. Entries that vanish
/// or cannot be inspected during the listing are skipped with a warning; only
/// a failure to open the directory itself is an error.
pub fn list_files(dir: &Path) -> Result<Vec<FileEntry>, CleanupError> {
    let read_dir = fs::read_dir(dir).map_err(|source| CleanupError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };

        match FileEntry::from_path(entry.path()) {
            Ok(Some(file)) => files.push(file),
            Ok(None) => tracing::debug!("Skipping non-file {}", entry.path().display()),
            Err(e) => tracing::warn!("Skipping {}: {e}", entry.path().display()),
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_skips_directories() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();
        fs::write(temp.path().join("a.JPG"), "a").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/c.txt"), "c").unwrap();

        let files = list_files(temp.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.JPG", "b.txt"]);
        assert_eq!(files[0].extension(), Some("jpg"));
        assert_eq!(files[1].size, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_files_marks_symlinks() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("target.pdf"), "pdf").unwrap();
        std::os::unix::fs::symlink(
            temp.path().join("target.pdf"),
            temp.path().join("link.pdf"),
        )
        .unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("dangling"))
            .unwrap();

        let files = list_files(temp.path()).unwrap();
        let seen: Vec<(&str, bool)> = files
            .iter()
            .map(|f| (f.name.as_str(), f.is_symlink))
            .collect();
        assert_eq!(seen, vec![("link.pdf", true), ("target.pdf", false)]);
        assert_eq!(files[0].size, 3);
    }

    #[test]
    fn test_list_files_missing_dir() {
        let temp = TempDir::new().unwrap();
        let result = list_files(&temp.path().join("missing"));
        assert!(matches!(result, Err(CleanupError::ReadDir { .. })));
    }

    #[test]
    fn test_content_hash_hex() {
        let hash = ContentHash::new([0xab; 32]);
        assert_eq!(hash.to_hex().len(), 64);
        assert!(hash.to_hex().starts_with("abab"));
    }
}
