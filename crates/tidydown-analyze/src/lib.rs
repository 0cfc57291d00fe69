//! Analysis algorithms for tidydown.
//!
//! - **Duplicate grouping** - Partition a directory's files into classes of
//!   byte-identical content
//! - **Retention** - Pick the most recently modified member of each class
//!
//! # Duplicate Grouping
//!
//! The default strategy avoids reading most files:
//!
//! 1. Group files by size (files with a unique size are never read)
//! 2. Compute a full BLAKE3 hash for size-matched files
//!
//! The pairwise strategy compares raw bytes against each class
//! representative and yields the same partition.
//!
//! ```rust,ignore
//! use tidydown_analyze::{DuplicateFinder, plan_retention};
//!
//! let report = DuplicateFinder::new().find_in_dir(Path::new("/path/to/dir"))?;
//! for class in report.duplicate_classes() {
//!     let plan = plan_retention(class);
//!     println!("keep {:?}, remove {:?}", plan.keep, plan.remove);
//! }
//! ```

mod duplicates;
mod retention;

pub use duplicates::{
    DuplicateClass, DuplicateConfig, DuplicateConfigBuilder, DuplicateFinder, DuplicateReport,
};
pub use retention::{RetentionPlan, newest_index, plan_retention};

// Re-export core types
pub use tidydown_core::{ContentHash, FileEntry, GroupingStrategy};
