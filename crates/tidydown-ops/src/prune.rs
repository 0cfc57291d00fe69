//! Deleting all but the newest member of each duplicate class.

use tidydown_analyze::{DuplicateReport, plan_retention};

use crate::progress::{ActionKind, ActionRecord, StepReport};
use crate::purge::delete_file;

/// Delete every member of each duplicate class except the most recently
/// modified one.
///
/// Members whose metadata cannot be read are recorded as failures and left on
/// disk. Deletions are independent of each other.
pub fn prune_duplicates(report: &DuplicateReport) -> StepReport {
    let mut step = StepReport::new(ActionKind::DeleteDuplicate);

    for class in report.duplicate_classes() {
        let plan = plan_retention(class);

        for error in plan.unreadable {
            tracing::error!("Error reading {}: {}", error.path.display(), error.message);
            step.push(ActionRecord::failed(
                ActionKind::DeleteDuplicate,
                error.path.clone(),
                None,
                error,
            ));
        }

        if let Some(keep) = &plan.keep {
            tracing::debug!("Keeping newest copy {}", keep.display());
        }

        for path in plan.remove {
            step.push(delete_file(ActionKind::DeleteDuplicate, path, class.size));
        }
    }

    step
}
