//! File operations engine for tidydown.
//!
//! Every step works on the top level of a single directory and runs
//! synchronously. Per-file failures are returned as [`ActionRecord`]s rather
//! than errors, so one bad file never stops its siblings from being handled.

mod conflict;
mod create;
mod move_op;
mod pipeline;
mod progress;
mod prune;
mod purge;

pub use conflict::{Conflict, ConflictKind, ConflictResolution, Placement, place};
pub use create::create_target_folders;
pub use move_op::{move_file, sort_by_type, sort_files};
pub use pipeline::Cleaner;
pub use progress::{ActionKind, ActionOutcome, ActionRecord, RunSummary, StepReport};
pub use prune::prune_duplicates;
pub use purge::{purge_executables, purge_files};

// Re-export core types
pub use tidydown_core::{CleanupConfig, CleanupError, OperationError};
