//! Resolution of logical folder names to paths under a home directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CleanupError;

/// Maps folder names such as `"Downloads"` or `"Images"` to absolute paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderResolver {
    home: PathBuf,
}

impl FolderResolver {
    /// Create a resolver rooted at an explicit directory.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Create a resolver rooted at the current user's home directory.
    pub fn from_home_dir() -> Result<Self, CleanupError> {
        dirs::home_dir()
            .map(Self::new)
            .ok_or(CleanupError::HomeDirNotFound)
    }

    /// The directory folder names are resolved against.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Join a folder name onto the home directory. The name is not validated.
    pub fn resolve(&self, folder_name: &str) -> PathBuf {
        self.home.join(folder_name)
    }
}
