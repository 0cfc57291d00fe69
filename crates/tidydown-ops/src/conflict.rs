//! Destination collision handling for moves.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::Display;

pub use tidydown_core::ConflictResolution;

/// A collision detected while placing a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The file being moved.
    pub source: PathBuf,
    /// The occupied destination.
    pub destination: PathBuf,
    /// The kind of conflict.
    pub kind: ConflictKind,
}

impl Conflict {
    /// Create a new conflict.
    pub fn new(source: PathBuf, destination: PathBuf, kind: ConflictKind) -> Self {
        Self {
            source,
            destination,
            kind,
        }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.destination.display())
    }
}

/// The kind of conflict encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ConflictKind {
    /// A file already exists at the destination.
    #[strum(to_string = "File already exists")]
    FileExists,
    /// A directory already exists at the destination.
    #[strum(to_string = "Directory already exists")]
    DirectoryExists,
    /// Source and destination are the same file.
    #[strum(to_string = "Source and destination are the same file")]
    SameFile,
}

/// Where a file should go once collisions are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Move to this path.
    Target(PathBuf),
    /// Leave the file in place.
    Skip(Conflict),
}

/// Decide the final destination of `source` inside `dest_dir`.
///
/// A directory at the destination is never replaced. `Overwrite` targets the
/// occupied path and relies on the move replacing the existing file.
/// `AutoRename` picks "name (1).ext", "name (2).ext" and so on.
pub fn place(source: &Path, dest_dir: &Path, resolution: ConflictResolution) -> Placement {
    let dest_path = dest_dir.join(source.file_name().unwrap_or_default());

    if dest_path == source {
        return Placement::Skip(Conflict::new(
            source.to_path_buf(),
            dest_path,
            ConflictKind::SameFile,
        ));
    }

    let Ok(existing) = fs::symlink_metadata(&dest_path) else {
        return Placement::Target(dest_path);
    };

    let kind = if existing.is_dir() {
        ConflictKind::DirectoryExists
    } else {
        ConflictKind::FileExists
    };

    match (resolution, kind) {
        (ConflictResolution::AutoRename, _) => Placement::Target(next_free_path(&dest_path)),
        (ConflictResolution::Overwrite, ConflictKind::FileExists) => Placement::Target(dest_path),
        _ => Placement::Skip(Conflict::new(source.to_path_buf(), dest_path, kind)),
    }
}

/// First free "name (n).ext" sibling of an occupied path, counting from 1.
///
/// Names are built from the raw file name, so non-UTF-8 names survive. A
/// dangling symlink counts as occupied.
fn next_free_path(taken: &Path) -> PathBuf {
    let stem = taken.file_stem().unwrap_or_default();
    let extension = taken.extension();

    (1u32..)
        .map(|n| {
            let mut name = stem.to_os_string();
            name.push(format!(" ({n})"));
            if let Some(ext) = extension {
                name.push(".");
                name.push(ext);
            }
            taken.with_file_name(name)
        })
        .find(|candidate| fs::symlink_metadata(candidate).is_err())
        .unwrap_or_else(|| taken.to_path_buf())
}
