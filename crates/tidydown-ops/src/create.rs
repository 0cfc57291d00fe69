//! Category folder creation.

use std::fs;
use std::path::PathBuf;

use tidydown_core::{CleanupConfig, CleanupError};

/// Create every category folder, including the fallback, with missing parents.
///
/// Folders that already exist are left alone. Returns the folders that were
/// created. Any failure aborts, since sorting needs every folder in place.
pub fn create_target_folders(config: &CleanupConfig) -> Result<Vec<PathBuf>, CleanupError> {
    let mut created = Vec::new();

    for folder in config.categories.folder_names() {
        let path = config.category_path(folder);
        if path.is_dir() {
            continue;
        }

        fs::create_dir_all(&path).map_err(|source| CleanupError::CreateFolder {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Created folder: {}", path.display());
        created.push(path);
    }

    Ok(created)
}
