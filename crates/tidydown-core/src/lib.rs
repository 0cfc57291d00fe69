//! Core types and configuration for tidydown.
//!
//! This crate provides the data structures shared by the analysis and
//! operation crates: the category table, the folder resolver, file entries
//! and the error types.

mod category;
mod config;
mod entry;
mod error;
mod resolver;

pub use category::{CategoryMap, FALLBACK_CATEGORY};
pub use config::{
    CleanupConfig, CleanupConfigBuilder, ConflictResolution, DedupScope, GroupingStrategy,
};
pub use entry::{ContentHash, FileEntry, list_files};
pub use error::{CleanupError, OperationError};
pub use resolver::FolderResolver;
