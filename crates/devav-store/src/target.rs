//! Write side: the transactional target store
//!
//! [`TargetStore`] is object safe so a single handle can be shared by every
//! import task of a stage. [`TargetStoreExt`] layers the typed operations on
//! top of it.

use crate::error::StoreError;
use async_trait::async_trait;
use devav_model::{AnyEntity, Entity, EntityId, EntityKind, FieldInfo, Ref};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of a successful commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
    /// Store version after the commit; unchanged for an empty commit
    pub version: u64,
    /// Entities persisted by this commit, per kind
    pub created: BTreeMap<EntityKind, usize>,
}

impl CommitReceipt {
    /// Total number of entities persisted
    #[must_use]
    pub fn total(&self) -> usize {
        self.created.values().sum()
    }

    /// Whether the commit persisted nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }
}

/// Transactional object store
///
/// Creations are pending until [`TargetStore::commit`] persists them as a
/// unit. Reads observe committed state plus the session's pending
/// creations.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Track a new entity, uncommitted, and mint its identity
    fn insert(&self, entity: AnyEntity) -> EntityId;

    /// Entity of `kind` with identity `id`
    fn fetch(&self, kind: EntityKind, id: EntityId) -> Option<AnyEntity>;

    /// Every entity of `kind`, ordered by identity
    fn scan(&self, kind: EntityKind) -> Vec<(EntityId, AnyEntity)>;

    /// Number of pending creations
    fn pending_count(&self) -> usize;

    /// Drop every pending creation, returning how many were dropped
    fn discard(&self) -> usize;

    /// Persist all pending creations atomically
    ///
    /// # Errors
    /// [`StoreError::ConstraintViolation`] when the batch is rejected; in
    /// that case nothing is applied and the batch stays pending.
    async fn commit(&self) -> Result<CommitReceipt, StoreError>;

    /// Schema query: clonable fields of `kind`
    ///
    /// # Errors
    /// [`StoreError::SchemaUnavailable`] for kinds without a clone schema
    async fn clonable_fields(&self, kind: EntityKind) -> Result<Vec<FieldInfo>, StoreError>;
}

/// Typed operations over any [`TargetStore`]
pub trait TargetStoreExt: TargetStore {
    /// Track `entity` for creation and return a reference to it
    fn create<T: Entity>(&self, entity: T) -> Ref<T> {
        Ref::new(self.insert(entity.into_any()))
    }

    /// Entity behind `r`
    fn get<T: Entity>(&self, r: Ref<T>) -> Option<T> {
        self.fetch(T::KIND, r.id()).and_then(T::from_any)
    }

    /// Every entity of type `T`, ordered by identity
    fn all<T: Entity>(&self) -> Vec<(Ref<T>, T)> {
        self.scan(T::KIND)
            .into_iter()
            .filter_map(|(id, any)| T::from_any(any).map(|e| (Ref::new(id), e)))
            .collect()
    }

    /// First entity of type `T` matching `predicate`
    fn find<T: Entity>(&self, predicate: impl Fn(&T) -> bool) -> Option<(Ref<T>, T)> {
        self.all::<T>().into_iter().find(|(_, e)| predicate(e))
    }
}

impl<S: TargetStore + ?Sized> TargetStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_totals() {
        let mut receipt = CommitReceipt::default();
        assert!(receipt.is_empty());
        receipt.created.insert(EntityKind::Order, 2);
        receipt.created.insert(EntityKind::OrderItem, 5);
        assert_eq!(receipt.total(), 7);
    }
}
