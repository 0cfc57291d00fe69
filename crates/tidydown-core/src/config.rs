//! Cleanup configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{CategoryMap, CleanupError, FolderResolver};

/// Where duplicate detection looks for files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DedupScope {
    /// The source folder itself, after purging and before sorting.
    #[default]
    Source,
    /// The top level of every category folder, after sorting.
    CategoryFolders,
}

/// How files are partitioned into duplicate classes.
///
/// Both strategies produce the same partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupingStrategy {
    /// Bucket by size, then by BLAKE3 content hash.
    #[default]
    Hashed,
    /// Compare each file byte-for-byte against the first member of every class.
    Pairwise,
}

/// What to do when a moved file's name is already taken at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConflictResolution {
    /// Leave the file where it is.
    Skip,
    /// Replace the existing file.
    Overwrite,
    /// Pick a free name such as "file (1).txt".
    #[default]
    AutoRename,
}

/// Configuration for a cleanup run.
#[derive(Debug, Clone, Builder, Serialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CleanupConfig {
    /// Resolves folder names against the home directory.
    pub resolver: FolderResolver,

    /// Name of the folder to clean.
    #[builder(default = "String::from(\"Downloads\")")]
    pub source_folder: String,

    /// Category table used for sorting and folder creation.
    #[builder(default)]
    pub categories: CategoryMap,

    /// Glob matched against file names of executables to delete.
    #[builder(default = "String::from(\"*.exe\")")]
    pub executable_pattern: String,

    /// Collision policy for moves.
    #[builder(default)]
    pub on_collision: ConflictResolution,

    /// Where duplicates are looked for.
    #[builder(default)]
    pub dedup_scope: DedupScope,

    /// Duplicate grouping algorithm.
    #[builder(default)]
    pub grouping: GroupingStrategy,
}

impl CleanupConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.resolver.is_none() {
            return Err("Folder resolver is required".to_string());
        }
        if let Some(ref source) = self.source_folder {
            if source.is_empty() {
                return Err("Source folder cannot be empty".to_string());
            }
        }
        if let Some(ref pattern) = self.executable_pattern {
            compile_pattern(pattern).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl CleanupConfig {
    /// Create a new config builder.
    pub fn builder() -> CleanupConfigBuilder {
        CleanupConfigBuilder::default()
    }

    /// Default configuration rooted at an explicit home directory.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self::with_resolver(FolderResolver::new(home))
    }

    /// Default configuration rooted at the current user's home directory.
    pub fn from_home_dir() -> Result<Self, CleanupError> {
        Ok(Self::with_resolver(FolderResolver::from_home_dir()?))
    }

    fn with_resolver(resolver: FolderResolver) -> Self {
        Self {
            resolver,
            source_folder: "Downloads".to_string(),
            categories: CategoryMap::default(),
            executable_pattern: "*.exe".to_string(),
            on_collision: ConflictResolution::default(),
            dedup_scope: DedupScope::default(),
            grouping: GroupingStrategy::default(),
        }
    }

    /// Absolute path of the folder being cleaned.
    pub fn source_path(&self) -> PathBuf {
        self.resolver.resolve(&self.source_folder)
    }

    /// Absolute path of a category folder.
    pub fn category_path(&self, category: &str) -> PathBuf {
        self.resolver.resolve(category)
    }

    /// Compile the executable pattern into a case-insensitive matcher.
    pub fn executable_matcher(&self) -> Result<GlobMatcher, CleanupError> {
        compile_pattern(&self.executable_pattern)
    }
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher, CleanupError> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| {
            CleanupError::invalid_config(format!("Bad executable pattern '{pattern}': {e}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = CleanupConfig::builder()
            .resolver(FolderResolver::new("/home/user"))
            .source_folder("Inbox")
            .on_collision(ConflictResolution::Skip)
            .build()
            .unwrap();

        assert_eq!(config.source_path(), PathBuf::from("/home/user/Inbox"));
        assert_eq!(config.on_collision, ConflictResolution::Skip);
        assert_eq!(config.executable_pattern, "*.exe");
        assert_eq!(config.dedup_scope, DedupScope::Source);
    }

    #[test]
    fn test_config_simple() {
        let config = CleanupConfig::new("/home/user");
        assert_eq!(config.source_path(), PathBuf::from("/home/user/Downloads"));
        assert_eq!(
            config.category_path("Images"),
            PathBuf::from("/home/user/Images")
        );
        assert_eq!(config.on_collision, ConflictResolution::AutoRename);
        assert_eq!(config.grouping, GroupingStrategy::Hashed);
    }

    #[test]
    fn test_builder_requires_resolver() {
        assert!(CleanupConfig::builder().build().is_err());
    }

    #[test]
    fn test_builder_rejects_bad_pattern() {
        let result = CleanupConfig::builder()
            .resolver(FolderResolver::new("/home/user"))
            .executable_pattern("*.{exe")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_conflict_resolution_display() {
        assert_eq!(ConflictResolution::Skip.to_string(), "skip");
        assert_eq!(ConflictResolution::Overwrite.to_string(), "overwrite");
        assert_eq!(ConflictResolution::AutoRename.to_string(), "auto-rename");
    }

    #[test]
    fn test_executable_matcher_ignores_case() {
        let matcher = CleanupConfig::new("/home/user").executable_matcher().unwrap();
        assert!(matcher.is_match("setup.exe"));
        assert!(matcher.is_match("SETUP.EXE"));
        assert!(!matcher.is_match("setup.exe.txt"));
        assert!(!matcher.is_match("notes.txt"));
    }
}
