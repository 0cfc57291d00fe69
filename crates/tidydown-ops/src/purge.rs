//! Executable removal from the source folder.

use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobMatcher;

use tidydown_core::{CleanupError, FileEntry, OperationError, list_files};

use crate::progress::{ActionKind, ActionRecord, StepReport};

/// Delete every file directly inside `source` whose name matches `matcher`.
///
/// Each deletion is independent: a failure is recorded and the remaining
/// files are still processed. Only failing to list `source` is an error.
pub fn purge_executables(source: &Path, matcher: &GlobMatcher) -> Result<StepReport, CleanupError> {
    let files = list_files(source)?;
    Ok(purge_files(&files, matcher))
}

/// Delete the listed files whose name matches `matcher`.
pub fn purge_files(files: &[FileEntry], matcher: &GlobMatcher) -> StepReport {
    let mut report = StepReport::new(ActionKind::DeleteExecutable);

    for file in files.iter().filter(|f| matcher.is_match(f.name.as_str())) {
        report.push(delete_file(
            ActionKind::DeleteExecutable,
            file.path.clone(),
            file.size,
        ));
    }

    report
}

/// Remove one file, logging the outcome.
pub(crate) fn delete_file(kind: ActionKind, path: PathBuf, size: u64) -> ActionRecord {
    match fs::remove_file(&path) {
        Ok(()) => {
            match kind {
                ActionKind::DeleteDuplicate => {
                    tracing::info!("Deleted duplicate: {}", path.display())
                }
                _ => tracing::info!("Deleted: {}", path.display()),
            }
            ActionRecord::done(kind, path, None, size)
        }
        Err(e) => {
            tracing::error!("Error deleting {}: {e}", path.display());
            let error = OperationError::io(&path, &e);
            ActionRecord::failed(kind, path, None, error)
        }
    }
}
