//! Read side: the legacy source store

use crate::error::StoreError;
use devav_model::{EntityKind, SourceRecord, SourceRow};
use futures::stream::{BoxStream, StreamExt};

/// Enumeration request for one source collection
///
/// `includes` names the reference fields whose related rows must be
/// eagerly loaded alongside each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    /// Collection to enumerate
    pub kind: EntityKind,
    /// Reference fields to load eagerly
    pub includes: Vec<&'static str>,
}

impl SourceQuery {
    /// Enumerate-all query without includes
    #[must_use]
    pub fn all(kind: EntityKind) -> Self {
        Self {
            kind,
            includes: Vec::new(),
        }
    }

    /// Add an eagerly loaded reference field
    #[must_use]
    pub fn include(mut self, field: &'static str) -> Self {
        self.includes.push(field);
        self
    }
}

/// Read-only legacy store exposed as per-kind record collections
pub trait SourceStore: Send + Sync {
    /// Stream every record of `query.kind`
    ///
    /// The stream is finite and one-shot.
    fn records(&self, query: SourceQuery) -> BoxStream<'_, Result<SourceRecord, StoreError>>;
}

/// Typed enumeration on top of [`SourceStore`]
pub trait SourceStoreExt: SourceStore {
    /// Stream rows of type `R`, rejecting records of any other kind
    fn rows<R: SourceRow>(&self, query: SourceQuery) -> BoxStream<'_, Result<R, StoreError>> {
        self.records(query)
            .map(|record| {
                record.and_then(|r| {
                    R::from_record(r).map_err(|other| StoreError::RowKindMismatch {
                        expected: R::KIND,
                        found: other.kind(),
                    })
                })
            })
            .boxed()
    }
}

impl<S: SourceStore + ?Sized> SourceStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_accumulates_fields() {
        let q = SourceQuery::all(EntityKind::Order)
            .include("Customer")
            .include("Store");
        assert_eq!(q.kind, EntityKind::Order);
        assert_eq!(q.includes, vec!["Customer", "Store"]);
    }
}
