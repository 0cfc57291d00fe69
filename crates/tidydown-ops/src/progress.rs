//! Per-file outcomes and their aggregation into step and run reports.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::Display;

use tidydown_core::OperationError;

/// The kind of per-file action performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ActionKind {
    #[strum(to_string = "Delete executable")]
    DeleteExecutable,
    #[strum(to_string = "Move")]
    Move,
    #[strum(to_string = "Delete duplicate")]
    DeleteDuplicate,
}

impl ActionKind {
    fn past_tense(self) -> &'static str {
        match self {
            Self::DeleteExecutable => "Deleted",
            Self::Move => "Moved",
            Self::DeleteDuplicate => "Removed",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::DeleteExecutable => "executables",
            Self::Move => "files",
            Self::DeleteDuplicate => "duplicates",
        }
    }
}

/// How a single action ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The action completed.
    Done,
    /// The action was deliberately not performed.
    Skipped { reason: String },
    /// The action failed.
    Failed { error: OperationError },
}

/// One per-file action and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// What was attempted.
    pub kind: ActionKind,
    /// The file acted on.
    pub source: PathBuf,
    /// Where the file went, for moves.
    pub destination: Option<PathBuf>,
    /// Bytes moved or freed.
    pub bytes: u64,
    /// How it ended.
    pub outcome: ActionOutcome,
}

impl ActionRecord {
    /// A completed action.
    pub fn done(
        kind: ActionKind,
        source: PathBuf,
        destination: Option<PathBuf>,
        bytes: u64,
    ) -> Self {
        Self {
            kind,
            source,
            destination,
            bytes,
            outcome: ActionOutcome::Done,
        }
    }

    /// An action that was not attempted.
    pub fn skipped(kind: ActionKind, source: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            kind,
            source,
            destination: None,
            bytes: 0,
            outcome: ActionOutcome::Skipped {
                reason: reason.into(),
            },
        }
    }

    /// A failed action.
    pub fn failed(
        kind: ActionKind,
        source: PathBuf,
        destination: Option<PathBuf>,
        error: OperationError,
    ) -> Self {
        Self {
            kind,
            source,
            destination,
            bytes: 0,
            outcome: ActionOutcome::Failed { error },
        }
    }

    /// Check if the action completed.
    pub fn is_done(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Done)
    }

    /// Check if the action failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Failed { .. })
    }

    /// The error, if the action failed.
    pub fn error(&self) -> Option<&OperationError> {
        match &self.outcome {
            ActionOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// All actions produced by one pipeline step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// The kind of action this step performs.
    pub kind: ActionKind,
    /// Actions in the order they were attempted.
    pub records: Vec<ActionRecord>,
}

impl StepReport {
    /// Create an empty report.
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// Append a record.
    pub fn push(&mut self, record: ActionRecord) {
        self.records.push(record);
    }

    /// Append all records of another report.
    pub fn extend(&mut self, other: StepReport) {
        self.records.extend(other.records);
    }

    /// Number of completed actions.
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.is_done()).count()
    }

    /// Number of skipped actions.
    pub fn skipped(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, ActionOutcome::Skipped { .. }))
            .count()
    }

    /// Number of failed actions.
    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| r.is_failed()).count()
    }

    /// Bytes moved or freed by completed actions.
    pub fn bytes_processed(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| r.is_done())
            .map(|r| r.bytes)
            .sum()
    }

    /// Errors from failed actions.
    pub fn errors(&self) -> impl Iterator<Item = &OperationError> {
        self.records.iter().filter_map(ActionRecord::error)
    }

    /// Check if no action failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Get a human-readable summary of the step.
    pub fn summary(&self) -> String {
        let mut msg = format!(
            "{} {} {}",
            self.kind.past_tense(),
            self.succeeded(),
            self.kind.noun()
        );
        if self.skipped() > 0 {
            msg.push_str(&format!(", {} skipped", self.skipped()));
        }
        if self.failed() > 0 {
            msg.push_str(&format!(", {} failed", self.failed()));
        }
        msg
    }
}

/// Aggregated outcome of one cleanup run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// The folder that was cleaned.
    pub source: PathBuf,
    /// When the run started.
    pub started_at: DateTime<Local>,
    /// When the run finished.
    pub finished_at: DateTime<Local>,
    /// Category folders that did not exist before the run.
    pub folders_created: Vec<PathBuf>,
    /// Executable deletions.
    pub purge: StepReport,
    /// Duplicate deletions.
    pub prune: StepReport,
    /// Moves into category folders.
    pub sort: StepReport,
    /// Number of duplicate classes found.
    pub duplicate_groups: usize,
    /// Files whose content could not be compared.
    pub unreadable: Vec<OperationError>,
}

impl RunSummary {
    /// Steps in execution order of the default pipeline.
    pub fn steps(&self) -> [&StepReport; 3] {
        [&self.purge, &self.prune, &self.sort]
    }

    /// Total failed actions plus unreadable files.
    pub fn total_failed(&self) -> usize {
        self.steps().iter().map(|s| s.failed()).sum::<usize>() + self.unreadable.len()
    }

    /// Bytes freed by deletions.
    pub fn bytes_freed(&self) -> u64 {
        self.purge.bytes_processed() + self.prune.bytes_processed()
    }

    /// Check whether any action changed the filesystem.
    pub fn changed_anything(&self) -> bool {
        !self.folders_created.is_empty() || self.steps().iter().any(|s| s.succeeded() > 0)
    }

    /// All per-file errors of the run.
    pub fn errors(&self) -> impl Iterator<Item = &OperationError> {
        self.purge
            .errors()
            .chain(self.prune.errors())
            .chain(self.sort.errors())
            .chain(self.unreadable.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_summary() {
        let mut step = StepReport::new(ActionKind::Move);
        step.push(ActionRecord::done(
            ActionKind::Move,
            PathBuf::from("/d/a.txt"),
            Some(PathBuf::from("/Documents/a.txt")),
            10,
        ));
        step.push(ActionRecord::skipped(
            ActionKind::Move,
            PathBuf::from("/d/b.txt"),
            "File already exists",
        ));
        step.push(ActionRecord::failed(
            ActionKind::Move,
            PathBuf::from("/d/c.txt"),
            None,
            OperationError::new("/d/c.txt", "Permission denied"),
        ));

        assert_eq!(step.succeeded(), 1);
        assert_eq!(step.skipped(), 1);
        assert_eq!(step.failed(), 1);
        assert_eq!(step.bytes_processed(), 10);
        assert!(!step.is_success());
        assert_eq!(step.summary(), "Moved 1 files, 1 skipped, 1 failed");
    }

    #[test]
    fn test_action_kind_display() {
        assert_eq!(ActionKind::DeleteExecutable.to_string(), "Delete executable");
        assert_eq!(ActionKind::Move.to_string(), "Move");
    }
}
