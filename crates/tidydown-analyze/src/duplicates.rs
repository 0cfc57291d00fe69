//! Duplicate file grouping by full content equality.
//!
//! Files are processed in path order and partitioned into classes. A class is
//! identified by its first-seen member; every later file joins the first class
//! whose content it matches, or opens a new one. Two strategies compute the
//! same partition:
//!
//! - **Pairwise**: compare bytes against the first member of each class.
//! - **Hashed**: bucket by size, then by full BLAKE3 hash. Files with a unique
//!   size are never read.
//!
//! Symbolic links are not grouped: a link shares its target's content, and
//! pruning it as a copy could delete the only real file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use blake3::Hasher;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use tidydown_core::{
    CleanupError, ContentHash, FileEntry, GroupingStrategy, OperationError, list_files,
};

/// Configuration for duplicate grouping.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct DuplicateConfig {
    /// Grouping algorithm.
    #[builder(default)]
    pub strategy: GroupingStrategy,

    /// Read buffer size in bytes for hashing and comparison.
    #[builder(default = "64 * 1024")]
    pub buffer_size: usize,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            strategy: GroupingStrategy::default(),
            buffer_size: 64 * 1024,
        }
    }
}

impl DuplicateConfig {
    /// Create a new config builder.
    pub fn builder() -> DuplicateConfigBuilder {
        DuplicateConfigBuilder::default()
    }
}

/// Files sharing byte-identical content, in path order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateClass {
    /// Size of each member in bytes.
    pub size: u64,
    /// Members; the first is the class representative.
    pub members: Vec<PathBuf>,
}

impl DuplicateClass {
    fn new(entry: &FileEntry) -> Self {
        Self {
            size: entry.size,
            members: vec![entry.path.clone()],
        }
    }

    /// The first-seen member.
    pub fn representative(&self) -> &Path {
        &self.members[0]
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the class has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the class holds more than one file.
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }

    /// Bytes reclaimable by keeping a single member.
    pub fn wasted_bytes(&self) -> u64 {
        self.size * (self.members.len() as u64).saturating_sub(1)
    }
}

/// Result of grouping one directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Every class, in order of first-seen member. Singletons included.
    pub classes: Vec<DuplicateClass>,

    /// Number of files considered.
    pub files_analyzed: u64,

    /// Files whose content could not be read. Each sits in its own class.
    pub unreadable: Vec<OperationError>,
}

impl DuplicateReport {
    /// Classes with more than one member.
    pub fn duplicate_classes(&self) -> impl Iterator<Item = &DuplicateClass> {
        self.classes.iter().filter(|c| c.is_duplicate())
    }

    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        self.duplicate_classes().next().is_some()
    }

    /// Number of classes with more than one member.
    pub fn group_count(&self) -> usize {
        self.duplicate_classes().count()
    }

    /// Number of files that belong to a duplicate class.
    pub fn files_with_duplicates(&self) -> usize {
        self.duplicate_classes().map(DuplicateClass::len).sum()
    }

    /// Total bytes reclaimable across all classes.
    pub fn total_wasted_space(&self) -> u64 {
        self.duplicate_classes().map(DuplicateClass::wasted_bytes).sum()
    }
}

/// Partitions files into duplicate classes.
pub struct DuplicateFinder {
    config: DuplicateConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with default config.
    pub fn new() -> Self {
        Self {
            config: DuplicateConfig::default(),
        }
    }

    /// Create a new duplicate finder with custom config.
    pub fn with_config(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Create a finder using the given strategy and default buffers.
    pub fn with_strategy(strategy: GroupingStrategy) -> Self {
        Self::with_config(DuplicateConfig {
            strategy,
            ..DuplicateConfig::default()
        })
    }

    /// Group the regular files directly inside `dir`.
    pub fn find_in_dir(&self, dir: &Path) -> Result<DuplicateReport, CleanupError> {
        let files = list_files(dir)?;
        Ok(self.group(&files))
    }

    /// Group the given files. They are processed in path order regardless of
    /// the order passed in. Symlinks are left out of the report.
    pub fn group(&self, files: &[FileEntry]) -> DuplicateReport {
        let mut sorted: Vec<&FileEntry> = files
            .iter()
            .filter(|file| {
                if file.is_symlink {
                    tracing::debug!("Not grouping symlink {}", file.path.display());
                }
                !file.is_symlink
            })
            .collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));

        let mut report = match self.config.strategy {
            GroupingStrategy::Hashed => self.group_hashed(&sorted),
            GroupingStrategy::Pairwise => self.group_pairwise(&sorted),
        };
        report.files_analyzed = sorted.len() as u64;

        tracing::debug!(
            "Grouped {} files into {} classes ({} with duplicates)",
            report.files_analyzed,
            report.classes.len(),
            report.group_count()
        );

        report
    }

    /// Size buckets, then full content hashes.
    fn group_hashed(&self, files: &[&FileEntry]) -> DuplicateReport {
        let mut size_counts: HashMap<u64, usize> = HashMap::new();
        for file in files {
            *size_counts.entry(file.size).or_default() += 1;
        }

        let mut report = DuplicateReport::default();
        let mut index: HashMap<(u64, ContentHash), usize> = HashMap::new();

        for file in files {
            if size_counts[&file.size] < 2 {
                report.classes.push(DuplicateClass::new(file));
                continue;
            }

            match self.compute_full_hash(&file.path) {
                Ok(hash) => match index.get(&(file.size, hash)) {
                    Some(&class_idx) => report.classes[class_idx].members.push(file.path.clone()),
                    None => {
                        index.insert((file.size, hash), report.classes.len());
                        report.classes.push(DuplicateClass::new(file));
                    }
                },
                Err(e) => {
                    record_unreadable(&mut report, file, &e);
                }
            }
        }

        report
    }

    /// Greedy comparison against each class representative.
    fn group_pairwise(&self, files: &[&FileEntry]) -> DuplicateReport {
        let mut report = DuplicateReport::default();

        'files: for file in files {
            for class_idx in 0..report.classes.len() {
                let class = &report.classes[class_idx];
                if class.size != file.size {
                    continue;
                }

                match self.contents_equal(&file.path, class.representative()) {
                    Ok(true) => {
                        report.classes[class_idx].members.push(file.path.clone());
                        continue 'files;
                    }
                    Ok(false) => {}
                    Err(CompareError::Candidate(e)) => {
                        record_unreadable(&mut report, file, &e);
                        continue 'files;
                    }
                    Err(CompareError::Representative(e)) => {
                        tracing::warn!(
                            "Could not re-read {}: {e}",
                            class.representative().display()
                        );
                    }
                }
            }

            report.classes.push(DuplicateClass::new(file));
        }

        report
    }

    /// Compare two files byte-for-byte.
    fn contents_equal(
        &self,
        candidate: &Path,
        representative: &Path,
    ) -> Result<bool, CompareError> {
        let mut left = File::open(candidate)
            .map(BufReader::new)
            .map_err(CompareError::Candidate)?;
        let mut right = File::open(representative)
            .map(BufReader::new)
            .map_err(CompareError::Representative)?;

        let mut left_buf = vec![0u8; self.config.buffer_size.max(1)];
        let mut right_buf = vec![0u8; self.config.buffer_size.max(1)];

        loop {
            let left_read = fill_buffer(&mut left, &mut left_buf).map_err(CompareError::Candidate)?;
            let right_read =
                fill_buffer(&mut right, &mut right_buf).map_err(CompareError::Representative)?;

            if left_read != right_read || left_buf[..left_read] != right_buf[..right_read] {
                return Ok(false);
            }
            if left_read == 0 {
                return Ok(true);
            }
        }
    }

    /// Compute full BLAKE3 hash of a file.
    fn compute_full_hash(&self, path: &Path) -> io::Result<ContentHash> {
        let mut file = File::open(path)?;
        let mut hasher = Hasher::new();
        let mut buffer = vec![0u8; self.config.buffer_size.max(1)];

        loop {
            let bytes_read = file.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(ContentHash::new(*hasher.finalize().as_bytes()))
    }
}

impl Default for DuplicateFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Which side of a comparison failed to read.
#[derive(Debug)]
enum CompareError {
    Candidate(io::Error),
    Representative(io::Error),
}

/// Read until `buf` is full or the reader is exhausted.
fn fill_buffer(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn record_unreadable(report: &mut DuplicateReport, file: &FileEntry, error: &io::Error) {
    let error = OperationError::io(&file.path, error);
    tracing::error!("Error comparing {}: {}", file.path.display(), error.message);
    report.unreadable.push(error);
    report.classes.push(DuplicateClass::new(file));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_files() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("file1.txt"), "duplicate content here").unwrap();
        fs::write(root.join("file2.txt"), "duplicate content here").unwrap();
        fs::write(root.join("file3.txt"), "unique content").unwrap();

        temp
    }

    #[test]
    fn test_compute_full_hash() {
        let temp = create_test_files();
        let finder = DuplicateFinder::new();

        let hash1 = finder.compute_full_hash(&temp.path().join("file1.txt")).unwrap();
        let hash2 = finder.compute_full_hash(&temp.path().join("file2.txt")).unwrap();
        let hash3 = finder.compute_full_hash(&temp.path().join("file3.txt")).unwrap();

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_contents_equal_small_buffer() {
        let temp = create_test_files();
        let finder = DuplicateFinder::with_config(DuplicateConfig {
            buffer_size: 3,
            ..DuplicateConfig::default()
        });

        let root = temp.path();
        assert!(
            finder
                .contents_equal(&root.join("file1.txt"), &root.join("file2.txt"))
                .unwrap()
        );
        assert!(
            !finder
                .contents_equal(&root.join("file1.txt"), &root.join("file3.txt"))
                .unwrap()
        );
    }

    #[test]
    fn test_contents_equal_missing_candidate() {
        let temp = create_test_files();
        let finder = DuplicateFinder::new();

        let result = finder.contents_equal(
            &temp.path().join("gone.txt"),
            &temp.path().join("file1.txt"),
        );
        assert!(matches!(result, Err(CompareError::Candidate(_))));
    }

    #[test]
    fn test_vanished_file_is_singleton() {
        let temp = create_test_files();
        let files = list_files(temp.path()).unwrap();
        fs::remove_file(temp.path().join("file2.txt")).unwrap();

        for strategy in [GroupingStrategy::Hashed, GroupingStrategy::Pairwise] {
            let report = DuplicateFinder::with_strategy(strategy).group(&files);
            assert_eq!(report.classes.len(), 3);
            assert!(!report.has_duplicates());
            assert_eq!(report.unreadable.len(), 1);
            assert_eq!(report.unreadable[0].path, temp.path().join("file2.txt"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_not_grouped_with_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("z_report.pdf");
        fs::write(&target, "quarterly numbers").unwrap();
        std::os::unix::fs::symlink(&target, temp.path().join("a_link.pdf")).unwrap();

        for strategy in [GroupingStrategy::Hashed, GroupingStrategy::Pairwise] {
            let report = DuplicateFinder::with_strategy(strategy)
                .find_in_dir(temp.path())
                .unwrap();
            assert!(!report.has_duplicates());
            assert_eq!(report.files_analyzed, 1);
            assert_eq!(report.classes[0].members, vec![target.clone()]);
        }
    }

    #[test]
    fn test_class_wasted_bytes() {
        let class = DuplicateClass {
            size: 100,
            members: vec![PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")],
        };
        assert_eq!(class.wasted_bytes(), 200);
        assert!(class.is_duplicate());
        assert!(!class.is_empty());
        assert_eq!(class.representative(), Path::new("/a"));
    }
}
