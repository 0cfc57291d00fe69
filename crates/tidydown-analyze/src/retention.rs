//! Choosing which member of a duplicate class survives.
//!
//! The member with the latest modification time is kept. Ties go to the
//! earliest member in class order, which is path order.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use tidydown_core::OperationError;

use crate::DuplicateClass;

/// Outcome of keeper selection for one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPlan {
    /// The surviving member, if any member could be inspected.
    pub keep: Option<PathBuf>,
    /// Members to delete.
    pub remove: Vec<PathBuf>,
    /// Members whose metadata could not be read. Neither kept nor removed.
    pub unreadable: Vec<OperationError>,
}

impl RetentionPlan {
    /// Whether the plan deletes anything.
    pub fn has_removals(&self) -> bool {
        !self.remove.is_empty()
    }
}

/// Plan the retention of a class by reading each member's modification time.
pub fn plan_retention(class: &DuplicateClass) -> RetentionPlan {
    let mut plan = RetentionPlan::default();
    let mut candidates: Vec<(PathBuf, SystemTime)> = Vec::with_capacity(class.len());

    for member in &class.members {
        match fs::metadata(member).and_then(|m| m.modified()) {
            Ok(modified) => candidates.push((member.clone(), modified)),
            Err(e) => plan.unreadable.push(OperationError::io(member, &e)),
        }
    }

    let times: Vec<SystemTime> = candidates.iter().map(|(_, t)| *t).collect();
    let Some(keep_idx) = newest_index(&times) else {
        return plan;
    };

    for (idx, (path, _)) in candidates.into_iter().enumerate() {
        if idx == keep_idx {
            plan.keep = Some(path);
        } else {
            plan.remove.push(path);
        }
    }

    plan
}

/// Index of the latest timestamp; the first one wins a tie.
pub fn newest_index(times: &[SystemTime]) -> Option<usize> {
    let mut best: Option<(usize, SystemTime)> = None;
    for (idx, &time) in times.iter().enumerate() {
        match best {
            Some((_, best_time)) if time <= best_time => {}
            _ => best = Some((idx, time)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_newest_index() {
        assert_eq!(newest_index(&[]), None);
        assert_eq!(newest_index(&[at(5)]), Some(0));
        assert_eq!(newest_index(&[at(1), at(9), at(3)]), Some(1));
    }

    #[test]
    fn test_newest_index_tie_prefers_first() {
        assert_eq!(newest_index(&[at(2), at(7), at(7), at(1)]), Some(1));
    }

    #[test]
    fn test_plan_keeps_newest() {
        let temp = TempDir::new().unwrap();
        let old = temp.path().join("a.txt");
        let new = temp.path().join("b.txt");
        fs::write(&old, "same").unwrap();
        fs::write(&new, "same").unwrap();
        File::options().write(true).open(&old).unwrap().set_modified(at(1_000)).unwrap();
        File::options().write(true).open(&new).unwrap().set_modified(at(2_000)).unwrap();

        let class = DuplicateClass {
            size: 4,
            members: vec![old.clone(), new.clone()],
        };
        let plan = plan_retention(&class);
        assert_eq!(plan.keep, Some(new));
        assert_eq!(plan.remove, vec![old]);
        assert!(plan.unreadable.is_empty());
    }

    #[test]
    fn test_plan_skips_missing_member() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("a.txt");
        fs::write(&present, "same").unwrap();

        let class = DuplicateClass {
            size: 4,
            members: vec![temp.path().join("gone.txt"), present.clone()],
        };
        let plan = plan_retention(&class);
        assert_eq!(plan.keep, Some(present));
        assert!(!plan.has_removals());
        assert_eq!(plan.unreadable.len(), 1);
    }
}
