//! The full cleanup run.

use chrono::Local;

use tidydown_analyze::{DuplicateFinder, DuplicateReport};
use tidydown_core::{CleanupConfig, CleanupError, DedupScope};

use crate::create::create_target_folders;
use crate::move_op::sort_by_type;
use crate::progress::{ActionKind, RunSummary, StepReport};
use crate::prune::prune_duplicates;
use crate::purge::purge_executables;

/// Runs every cleanup step once against the configured source folder.
///
/// Step order is folder creation, executable purge, then deduplication and
/// sorting. With [`DedupScope::Source`] duplicates are pruned in the source
/// folder before anything is moved; with [`DedupScope::CategoryFolders`] files
/// are sorted first and each category folder is deduplicated afterwards.
pub struct Cleaner {
    config: CleanupConfig,
    finder: DuplicateFinder,
}

impl Cleaner {
    /// Create a cleaner for the given configuration.
    pub fn new(config: CleanupConfig) -> Self {
        let finder = DuplicateFinder::with_strategy(config.grouping);
        Self { config, finder }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CleanupConfig {
        &self.config
    }

    /// Execute the run.
    ///
    /// Returns an error only for conditions that make the remaining steps
    /// pointless: a bad executable pattern, a category folder that cannot be
    /// created, or a source folder that cannot be listed. Per-file failures are
    /// reported in the summary.
    pub fn run(&self) -> Result<RunSummary, CleanupError> {
        let started_at = Local::now();
        let source = self.config.source_path();
        let matcher = self.config.executable_matcher()?;

        tracing::info!("Cleaning {}", source.display());

        let folders_created = create_target_folders(&self.config)?;
        let purge = purge_executables(&source, &matcher)?;

        let (prune, sort, duplicates) = match self.config.dedup_scope {
            DedupScope::Source => {
                let duplicates = self.finder.find_in_dir(&source)?;
                let prune = prune_duplicates(&duplicates);
                let sort = sort_by_type(&self.config)?;
                (prune, sort, vec![duplicates])
            }
            DedupScope::CategoryFolders => {
                let sort = sort_by_type(&self.config)?;
                let mut prune = StepReport::new(ActionKind::DeleteDuplicate);
                let mut duplicates = Vec::new();
                for folder in self.config.categories.folder_names() {
                    let report = self.finder.find_in_dir(&self.config.category_path(folder))?;
                    prune.extend(prune_duplicates(&report));
                    duplicates.push(report);
                }
                (prune, sort, duplicates)
            }
        };

        let summary = RunSummary {
            source,
            started_at,
            finished_at: Local::now(),
            folders_created,
            duplicate_groups: duplicates.iter().map(DuplicateReport::group_count).sum(),
            unreadable: duplicates.into_iter().flat_map(|d| d.unreadable).collect(),
            purge,
            prune,
            sort,
        };

        for step in summary.steps() {
            tracing::debug!("{}", step.summary());
        }
        tracing::info!("{} folder cleaned and organized.", self.config.source_folder);

        Ok(summary)
    }
}
