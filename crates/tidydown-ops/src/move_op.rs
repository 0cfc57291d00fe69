//! Sorting files into category folders.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tidydown_core::{CleanupConfig, CleanupError, FileEntry, OperationError, list_files};

use crate::conflict::{Placement, place};
use crate::progress::{ActionKind, ActionRecord, StepReport};

/// Move every file directly inside the source folder into its category folder.
///
/// Directories are left alone. Each move is independent: a failure is
/// recorded and the remaining files are still processed.
pub fn sort_by_type(config: &CleanupConfig) -> Result<StepReport, CleanupError> {
    let files = list_files(&config.source_path())?;
    Ok(sort_files(config, &files))
}

/// Move the given files into their category folders.
pub fn sort_files(config: &CleanupConfig, files: &[FileEntry]) -> StepReport {
    let mut report = StepReport::new(ActionKind::Move);

    for file in files {
        let category = config.categories.category_for_extension(file.extension());
        let dest_dir = config.category_path(category);

        let target = match place(&file.path, &dest_dir, config.on_collision) {
            Placement::Target(target) => target,
            Placement::Skip(conflict) => {
                tracing::warn!("Skipping {}: {conflict}", file.path.display());
                report.push(ActionRecord::skipped(
                    ActionKind::Move,
                    file.path.clone(),
                    conflict.to_string(),
                ));
                continue;
            }
        };

        match move_file(&file.path, &target) {
            Ok(bytes) => {
                tracing::info!("Moved: {} to {}", file.path.display(), target.display());
                report.push(ActionRecord::done(
                    ActionKind::Move,
                    file.path.clone(),
                    Some(target),
                    bytes,
                ));
            }
            Err(e) => {
                tracing::error!(
                    "Error moving {} to {}: {e}",
                    file.path.display(),
                    target.display()
                );
                report.push(ActionRecord::failed(
                    ActionKind::Move,
                    file.path.clone(),
                    Some(target),
                    OperationError::io(&file.path, &e),
                ));
            }
        }
    }

    report
}

/// Move a single file, replacing any file already at `dest`.
///
/// A plain rename is used whenever possible. Only when source and destination
/// live on different filesystems is the file copied and the source removed;
/// the copy keeps the modification time and never lands at `dest` unless the
/// source was removed.
pub fn move_file(source: &Path, dest: &Path) -> io::Result<u64> {
    let metadata = fs::metadata(source)?;

    match fs::rename(source, dest) {
        Ok(()) => Ok(metadata.len()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!("{} is on another filesystem, copying", dest.display());
            copy_then_remove(source, dest, &metadata)
        }
        Err(e) => Err(e),
    }
}

/// Copy `source` next to `dest` under a staging name, remove the source, then
/// put the copy in place. If the source cannot be removed the copy is deleted
/// and `dest` is left as it was.
fn copy_then_remove(source: &Path, dest: &Path, metadata: &fs::Metadata) -> io::Result<u64> {
    let staging = staging_path(dest);
    let size = fs::copy(source, &staging)?;

    if let Ok(modified) = metadata.modified() {
        if let Err(e) = File::options()
            .write(true)
            .open(&staging)
            .and_then(|f| f.set_modified(modified))
        {
            tracing::debug!("Could not preserve mtime on {}: {e}", dest.display());
        }
    }

    if let Err(e) = fs::remove_file(source) {
        if let Err(cleanup) = fs::remove_file(&staging) {
            tracing::warn!("Could not remove {}: {cleanup}", staging.display());
        }
        return Err(e);
    }

    if let Err(e) = fs::rename(&staging, dest) {
        tracing::error!(
            "{} was removed but its copy is still at {}",
            source.display(),
            staging.display()
        );
        return Err(e);
    }

    Ok(size)
}

/// Hidden sibling of `dest` used while a cross-filesystem copy is in flight.
fn staging_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(dest.file_name().unwrap_or_default());
    name.push(".tidydown-part");
    dest.with_file_name(name)
}
