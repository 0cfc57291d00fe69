//! Extension-to-folder category table.

use std::path::Path;

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::Serialize;

use crate::CleanupError;

/// Name of the catch-all category for files matching no extension set.
pub const FALLBACK_CATEGORY: &str = "Others";

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Images", &["jpg", "jpeg", "png", "gif", "bmp", "tiff"]),
    (
        "Documents",
        &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt"],
    ),
    ("Videos", &["mp4", "avi", "mov", "mkv"]),
    ("Music", &["mp3", "wav", "aac", "flac"]),
    ("Archives", &["zip", "rar", "tar", "gz", "7z"]),
];

/// Ordered mapping from category folder names to extension sets.
///
/// Extensions are stored lower-cased without a leading dot. Lookups walk the
/// categories in insertion order and the first match wins; construction
/// rejects an extension that appears in more than one category, so at most
/// one category can ever match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMap {
    categories: IndexMap<CompactString, Vec<CompactString>>,
    fallback: CompactString,
}

impl CategoryMap {
    /// Build a category map from `(folder, extensions)` pairs.
    ///
    /// Extensions may be given with or without a leading dot and in any case.
    pub fn new<I, N, E, S>(fallback: &str, categories: I) -> Result<Self, CleanupError>
    where
        I: IntoIterator<Item = (N, E)>,
        N: AsRef<str>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if fallback.is_empty() {
            return Err(CleanupError::invalid_config(
                "Fallback category name cannot be empty",
            ));
        }

        let mut map: IndexMap<CompactString, Vec<CompactString>> = IndexMap::new();
        for (name, extensions) in categories {
            let name = name.as_ref();
            if name.is_empty() {
                return Err(CleanupError::invalid_config(
                    "Category name cannot be empty",
                ));
            }
            if name == fallback {
                return Err(CleanupError::invalid_config(format!(
                    "Category '{name}' collides with the fallback category"
                )));
            }
            if map.contains_key(name) {
                return Err(CleanupError::invalid_config(format!(
                    "Category '{name}' is defined twice"
                )));
            }

            let mut normalized = Vec::new();
            for ext in extensions {
                let ext = normalize_extension(ext.as_ref());
                if ext.is_empty() {
                    return Err(CleanupError::invalid_config(format!(
                        "Category '{name}' has an empty extension"
                    )));
                }
                if let Some((owner, _)) = map.iter().find(|(_, exts)| exts.contains(&ext)) {
                    return Err(CleanupError::invalid_config(format!(
                        "Extension '{ext}' is listed under both '{owner}' and '{name}'"
                    )));
                }
                if !normalized.contains(&ext) {
                    normalized.push(ext);
                }
            }
            map.insert(CompactString::from(name), normalized);
        }

        Ok(Self {
            categories: map,
            fallback: CompactString::from(fallback),
        })
    }

    /// The catch-all category name.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Number of named categories, excluding the fallback.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether there are no named categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Extensions registered for a category, if it exists.
    pub fn extensions(&self, category: &str) -> Option<&[CompactString]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// All folder names in order, with the fallback last.
    pub fn folder_names(&self) -> impl Iterator<Item = &str> {
        self.categories
            .keys()
            .map(CompactString::as_str)
            .chain(std::iter::once(self.fallback.as_str()))
    }

    /// Category for a bare extension (case-insensitive, dot optional).
    pub fn category_for_extension(&self, extension: Option<&str>) -> &str {
        let Some(ext) = extension.map(normalize_extension) else {
            return &self.fallback;
        };
        if ext.is_empty() {
            return &self.fallback;
        }

        self.categories
            .iter()
            .find(|(_, exts)| exts.contains(&ext))
            .map(|(name, _)| name.as_str())
            .unwrap_or(&self.fallback)
    }

    /// Category for a path, based on its final extension.
    pub fn category_for(&self, path: &Path) -> &str {
        self.category_for_extension(path.extension().and_then(|e| e.to_str()))
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, exts)| {
                (
                    CompactString::from(*name),
                    exts.iter().map(|e| CompactString::from(*e)).collect(),
                )
            })
            .collect();

        Self {
            categories,
            fallback: CompactString::from(FALLBACK_CATEGORY),
        }
    }
}

fn normalize_extension(ext: &str) -> CompactString {
    CompactString::from(ext.trim_start_matches('.').to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let map = CategoryMap::default();
        let folders: Vec<&str> = map.folder_names().collect();
        assert_eq!(
            folders,
            vec!["Images", "Documents", "Videos", "Music", "Archives", "Others"]
        );
        assert_eq!(map.len(), 5);
        assert_eq!(map.fallback(), "Others");
    }

    #[test]
    fn test_case_insensitive_match() {
        let map = CategoryMap::default();
        assert_eq!(map.category_for(Path::new("photo.JPG")), "Images");
        assert_eq!(map.category_for(Path::new("photo.jpg")), "Images");
        assert_eq!(map.category_for(Path::new("Report.PdF")), "Documents");
    }

    #[test]
    fn test_unknown_and_missing_extension() {
        let map = CategoryMap::default();
        assert_eq!(map.category_for(Path::new("data.xyz")), "Others");
        assert_eq!(map.category_for(Path::new("README")), "Others");
        assert_eq!(map.category_for(Path::new(".bashrc")), "Others");
    }

    #[test]
    fn test_only_last_extension_counts() {
        let map = CategoryMap::default();
        assert_eq!(map.category_for(Path::new("backup.tar.gz")), "Archives");
        assert_eq!(map.category_for(Path::new("photo.jpg.part")), "Others");
    }

    #[test]
    fn test_rejects_shared_extension() {
        let result = CategoryMap::new(
            "Others",
            [("Images", vec![".png"]), ("Pictures", vec!["PNG"])],
        );
        assert!(matches!(result, Err(CleanupError::InvalidConfig { .. })));
    }

    #[test]
    fn test_rejects_fallback_collision() {
        let result = CategoryMap::new("Others", [("Others", vec!["bin"])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_map_normalizes() {
        let map = CategoryMap::new("Misc", [("Code", vec![".RS", "toml"])]).unwrap();
        assert_eq!(map.category_for(Path::new("main.rs")), "Code");
        assert_eq!(map.category_for(Path::new("Cargo.TOML")), "Code");
        assert_eq!(map.category_for(Path::new("a.py")), "Misc");
        assert_eq!(
            map.extensions("Code").unwrap(),
            &[CompactString::from("rs"), CompactString::from("toml")]
        );
    }
}
