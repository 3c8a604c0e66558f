//! Stage commit coordinator
//!
//! Drives the stage plan one stage at a time:
//! 1. spawn every import job of the stage on a [`JoinSet`]
//! 2. wait for all of them; on the first failure abort the siblings and
//!    drain the set so no task is still writing
//! 3. commit the stage's creations as one unit, then seal the index
//!
//! A failed stage leaves nothing behind: pending creations are discarded
//! from the store and from the index. Stages committed before it stay
//! committed; entities are never deleted.

use crate::config::MigrationConfig;
use crate::error::MigrationError;
use crate::importers::{ImportContext, ImportStats};
use crate::registry::ImportRegistry;
use crate::resolver::SourceIndex;
use crate::scheduler::StagePlan;
use crate::state::{PipelineState, StateTracker};
use devav_model::EntityKind;
use devav_store::{CommitReceipt, SourceStore, TargetStore};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Outcome of one committed stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Dependency level
    pub level: usize,
    /// Kinds imported by the stage
    pub kinds: Vec<EntityKind>,
    /// Per-task statistics, in completion order
    pub tasks: Vec<ImportStats>,
    /// Receipt of the stage commit
    pub receipt: CommitReceipt,
    /// Wall time, commit included
    pub elapsed: Duration,
}

impl StageReport {
    /// Source records read by the stage
    #[must_use]
    pub fn records(&self) -> usize {
        self.tasks.iter().map(|t| t.records).sum()
    }
}

/// Outcome of a completed migration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Committed stages in execution order
    pub stages: Vec<StageReport>,
    /// Receipt of the closing commit; empty unless work was left pending
    pub final_commit: CommitReceipt,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl MigrationReport {
    /// Source records read across all stages
    #[must_use]
    pub fn records(&self) -> usize {
        self.stages.iter().map(StageReport::records).sum()
    }

    /// Target entities persisted across all commits
    #[must_use]
    pub fn entities_created(&self) -> usize {
        self.stages.iter().map(|s| s.receipt.total()).sum::<usize>() + self.final_commit.total()
    }
}

/// One staged import run
#[derive(Debug)]
pub struct Migration {
    config: MigrationConfig,
    registry: ImportRegistry,
    state: StateTracker,
}

impl Migration {
    /// Run with the default import jobs
    #[must_use]
    pub fn new(config: MigrationConfig) -> Self {
        Self {
            config,
            registry: ImportRegistry::with_defaults(),
            state: StateTracker::new(),
        }
    }

    /// Replace the import jobs
    #[must_use]
    pub fn with_registry(mut self, registry: ImportRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Current pipeline state
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state.current()
    }

    /// Stage plan of the registered jobs
    ///
    /// # Errors
    /// [`MigrationError::Schedule`] when the jobs cannot be ordered
    pub fn plan(&self) -> Result<StagePlan, MigrationError> {
        Ok(self.registry.plan()?)
    }

    /// Import every registered kind from `source` into `target`
    ///
    /// Configuration and scheduling errors are raised before any stage
    /// runs and leave the state at [`PipelineState::NotStarted`].
    ///
    /// # Errors
    /// The first failure of any stage; the pipeline ends in
    /// [`PipelineState::Failed`]
    pub async fn run(
        &self,
        target: Arc<dyn TargetStore>,
        source: Arc<dyn SourceStore>,
    ) -> Result<MigrationReport, MigrationError> {
        self.config.validate()?;
        let plan = self.plan()?;
        let started = Instant::now();

        let cx = ImportContext {
            source,
            target: Arc::clone(&target),
            index: Arc::new(SourceIndex::new()),
            yield_interval: self.config.yield_interval,
        };
        let mut report = MigrationReport::default();

        for (level, kinds) in plan.iter() {
            self.state.advance(PipelineState::StageRunning(level))?;
            info!(stage = level, kinds = ?kinds, "stage started");
            let stage_started = Instant::now();

            let tasks = match self.run_stage(kinds, &cx).await {
                Ok(tasks) => tasks,
                Err(err) => return Err(self.fail(level, err, &cx)),
            };

            self.state.advance(PipelineState::StageCommitting(level))?;
            let receipt = match target.commit().await {
                Ok(receipt) => receipt,
                Err(source) => {
                    return Err(self.fail(level, MigrationError::Commit { stage: level, source }, &cx))
                }
            };
            let sealed = cx.index.seal();

            let stage = StageReport {
                level,
                kinds: kinds.to_vec(),
                tasks,
                receipt,
                elapsed: stage_started.elapsed(),
            };
            info!(
                stage = level,
                records = stage.records(),
                created = stage.receipt.total(),
                sealed,
                version = stage.receipt.version,
                "stage committed"
            );
            report.stages.push(stage);
        }

        let last = plan.len().saturating_sub(1);
        report.final_commit = match target.commit().await {
            Ok(receipt) => receipt,
            Err(source) => {
                return Err(self.fail(last, MigrationError::Commit { stage: last, source }, &cx))
            }
        };
        self.state.advance(PipelineState::Completed)?;
        report.elapsed = started.elapsed();

        info!(
            stages = report.stages.len(),
            records = report.records(),
            created = report.entities_created(),
            "migration completed"
        );
        Ok(report)
    }

    async fn run_stage(
        &self,
        kinds: &[EntityKind],
        cx: &ImportContext,
    ) -> Result<Vec<ImportStats>, MigrationError> {
        let mut set = JoinSet::new();
        for kind in kinds {
            let job = self
                .registry
                .get(*kind)
                .ok_or_else(|| MigrationError::Config(format!("no import job for {kind}")))?;
            let cx = cx.clone();
            set.spawn(async move { job.run(cx).await });
        }

        let mut tasks = Vec::with_capacity(kinds.len());
        let mut failure = None;
        while let Some(joined) = set.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(join_err) if join_err.is_cancelled() => continue,
                Err(join_err) => Err(MigrationError::TaskPanicked(join_err.to_string())),
            };
            match outcome {
                Ok(stats) => tasks.push(stats),
                Err(err) if failure.is_none() => {
                    set.abort_all();
                    failure = Some(err);
                }
                Err(err) => warn!(error = %err, "additional import failure after abort"),
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(tasks),
        }
    }

    fn fail(&self, level: usize, err: MigrationError, cx: &ImportContext) -> MigrationError {
        let discarded = cx.target.discard();
        let unregistered = cx.index.discard_pending();
        if let Err(state_err) = self.state.advance(PipelineState::Failed) {
            warn!(error = %state_err, "could not record failure");
        }
        error!(
            stage = level,
            error = %err,
            discarded,
            unregistered,
            "stage failed; pending work discarded"
        );
        err
    }
}

/// Run the full staged import with default configuration
///
/// # Errors
/// As [`Migration::run`]
pub async fn import_all(
    target: Arc<dyn TargetStore>,
    source: Arc<dyn SourceStore>,
) -> Result<MigrationReport, MigrationError> {
    Migration::new(MigrationConfig::default())
        .run(target, source)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use devav_store::{MemorySourceStore, MemoryTargetStore, SourceSnapshot};

    #[tokio::test]
    async fn empty_source_completes_with_empty_commits() {
        let target = Arc::new(MemoryTargetStore::new());
        let source = Arc::new(MemorySourceStore::new(SourceSnapshot::default()));
        let migration = Migration::new(MigrationConfig::default());

        let report = migration.run(target.clone(), source).await.unwrap();
        assert_eq!(migration.state(), PipelineState::Completed);
        assert_eq!(report.stages.len(), 5);
        assert_eq!(report.entities_created(), 0);
        assert_eq!(target.version(), 0);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_any_stage() {
        let target = Arc::new(MemoryTargetStore::new());
        let source = Arc::new(MemorySourceStore::new(SourceSnapshot::default()));
        let migration = Migration::new(MigrationConfig::default().with_yield_interval(0));

        let err = migration.run(target, source).await.unwrap_err();
        assert!(matches!(err, MigrationError::Config(_)));
        assert_eq!(migration.state(), PipelineState::NotStarted);
    }

    #[tokio::test]
    async fn empty_registry_completes_immediately() {
        let target = Arc::new(MemoryTargetStore::new());
        let source = Arc::new(MemorySourceStore::new(SourceSnapshot::default()));
        let migration =
            Migration::new(MigrationConfig::default()).with_registry(ImportRegistry::new());

        let report = migration.run(target, source).await.unwrap();
        assert!(report.stages.is_empty());
        assert_eq!(migration.state(), PipelineState::Completed);
    }
}
