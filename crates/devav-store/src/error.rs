//! Store errors

use devav_model::EntityKind;

/// Failure reported by a source or target store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Commit rejected; nothing from the batch was applied
    #[error("constraint violation on {kind}: {detail}")]
    ConstraintViolation {
        /// Kind of the offending entity
        kind: EntityKind,
        /// Store diagnostic
        detail: String,
    },

    /// No clone schema is published for the kind
    #[error("no clone schema published for {0}")]
    SchemaUnavailable(EntityKind),

    /// A source query yielded a row of another kind
    #[error("{expected} query yielded a {found} row")]
    RowKindMismatch {
        /// Kind that was queried
        expected: EntityKind,
        /// Kind of the row received
        found: EntityKind,
    },

    /// Source enumeration failed
    #[error("source store failure: {0}")]
    Source(String),

    /// Store not reachable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Snapshot could not be decoded
    #[error("snapshot decode failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// I/O failure while reading a snapshot
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether the store rejected the data itself, as opposed to failing
    /// to reach it
    #[inline]
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}
