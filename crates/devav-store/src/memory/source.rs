//! In-memory source store

use crate::error::StoreError;
use crate::memory::snapshot::SourceSnapshot;
use crate::source::{SourceQuery, SourceStore};
use devav_model::SourceRecord;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::Mutex;

/// Source store serving a loaded [`SourceSnapshot`]
///
/// Rows already carry their references, so includes need no extra
/// loading; queries are recorded for inspection.
#[derive(Debug, Default)]
pub struct MemorySourceStore {
    snapshot: SourceSnapshot,
    queries: Mutex<Vec<SourceQuery>>,
}

impl MemorySourceStore {
    /// Serve `snapshot`
    #[must_use]
    pub fn new(snapshot: SourceSnapshot) -> Self {
        Self {
            snapshot,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Underlying snapshot
    #[must_use]
    pub fn snapshot(&self) -> &SourceSnapshot {
        &self.snapshot
    }

    /// Queries issued so far, in arrival order
    #[must_use]
    pub fn queries(&self) -> Vec<SourceQuery> {
        self.queries.lock().clone()
    }
}

impl SourceStore for MemorySourceStore {
    fn records(&self, query: SourceQuery) -> BoxStream<'_, Result<SourceRecord, StoreError>> {
        let records = self.snapshot.records_of(query.kind);
        tracing::debug!(kind = %query.kind, includes = ?query.includes, records = records.len(), "source query");
        self.queries.lock().push(query);
        stream::iter(records.into_iter().map(Ok)).boxed()
    }
}
