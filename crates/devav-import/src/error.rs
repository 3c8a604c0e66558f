//! Error types for the migration pipeline
//!
//! Every variant is fatal: the pipeline never recovers locally and a
//! failure ends the run.

use crate::scheduler::ScheduleError;
use crate::state::StateError;
use devav_model::{EntityKind, SourceId, TransformError};
use devav_store::StoreError;

/// Main migration error type
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// A non-null source reference has no committed target entity
    #[error("no committed {kind} for source id {source_id}")]
    ReferenceResolution {
        /// Kind of the referenced entity
        kind: EntityKind,
        /// Unresolved legacy key
        source_id: SourceId,
    },

    /// A source value has no target representation
    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),

    /// The target store rejected a stage commit
    #[error("commit of stage {stage} failed: {source}")]
    Commit {
        /// Stage being committed
        stage: usize,
        /// Store diagnostic
        source: StoreError,
    },

    /// The target store rejected the batch of clones
    #[error("commit of {kind} clones failed: {source}")]
    CloneCommit {
        /// Parent kind of the aggregate
        kind: EntityKind,
        /// Store diagnostic
        source: StoreError,
    },

    /// Enumerating a source collection failed
    #[error("source enumeration failed: {0}")]
    Source(#[from] StoreError),

    /// The import tasks cannot be ordered
    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Same legacy key imported twice for one kind
    #[error("{kind} source id {source_id} imported twice")]
    DuplicateSourceId {
        /// Kind being imported
        kind: EntityKind,
        /// Repeated legacy key
        source_id: SourceId,
    },

    /// Imported entity carries no legacy key to register
    #[error("{0} entity has no SourceId to register")]
    MissingSourceId(EntityKind),

    /// An import task panicked
    #[error("import task panicked: {0}")]
    TaskPanicked(String),

    /// Illegal pipeline transition
    #[error("pipeline state error: {0}")]
    State(#[from] StateError),

    /// Clone descriptor could not be obtained or applied
    #[error("clone descriptor for {kind} unusable: {detail}")]
    Clone {
        /// Kind whose descriptor failed
        kind: EntityKind,
        /// Diagnostic
        detail: String,
    },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl MigrationError {
    /// Kind the error is attributed to, where one is known
    #[must_use]
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::ReferenceResolution { kind, .. }
            | Self::CloneCommit { kind, .. }
            | Self::DuplicateSourceId { kind, .. }
            | Self::Clone { kind, .. }
            | Self::MissingSourceId(kind) => Some(*kind),
            Self::Transform(TransformError::MissingReference { kind, .. }) => Some(*kind),
            _ => None,
        }
    }

    /// Whether the error stems from the target store refusing a commit
    #[inline]
    #[must_use]
    pub fn is_commit_failure(&self) -> bool {
        matches!(self, Self::Commit { .. } | Self::CloneCommit { .. })
    }
}
