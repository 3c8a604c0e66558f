//! Reference resolver
//!
//! The [`SourceIndex`] maps `(kind, SourceId)` to the target identity
//! created for that legacy row. It is built incrementally:
//! - importers [`register`](SourceIndex::register) each creation as pending
//! - the coordinator [`seal`](SourceIndex::seal)s pending entries once the
//!   stage commit succeeds, or [`discard_pending`](SourceIndex::discard_pending)s
//!   them on failure
//!
//! Resolution only consults sealed entries, so a lookup can never observe
//! an entity that is not yet durably committed.

use crate::error::MigrationError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use devav_model::{Entity, EntityId, EntityKind, Ref, SourceId, TransformError};

type Key = (EntityKind, SourceId);

/// Per-kind SourceId index for one import session
#[derive(Debug, Default)]
pub struct SourceIndex {
    committed: DashMap<Key, EntityId>,
    pending: DashMap<Key, EntityId>,
}

impl SourceIndex {
    /// Empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` was created for `(kind, source_id)`
    ///
    /// # Errors
    /// [`MigrationError::DuplicateSourceId`] if the key is already
    /// registered, committed or pending
    pub fn register(
        &self,
        kind: EntityKind,
        source_id: SourceId,
        id: EntityId,
    ) -> Result<(), MigrationError> {
        let key = (kind, source_id);
        if self.committed.contains_key(&key) {
            return Err(MigrationError::DuplicateSourceId { kind, source_id });
        }
        match self.pending.entry(key) {
            Entry::Occupied(_) => Err(MigrationError::DuplicateSourceId { kind, source_id }),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    /// Promote every pending entry; returns how many were promoted
    pub fn seal(&self) -> usize {
        let promoted: Vec<(Key, EntityId)> = self
            .pending
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        self.pending.clear();
        for (key, id) in &promoted {
            self.committed.insert(*key, *id);
        }
        promoted.len()
    }

    /// Drop every pending entry; returns how many were dropped
    pub fn discard_pending(&self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Committed identity for `(kind, source_id)`
    #[must_use]
    pub fn lookup(&self, kind: EntityKind, source_id: SourceId) -> Option<EntityId> {
        self.committed.get(&(kind, source_id)).map(|id| *id)
    }

    /// Number of committed entries of `kind`
    #[must_use]
    pub fn committed_len(&self, kind: EntityKind) -> usize {
        self.committed.iter().filter(|e| e.key().0 == kind).count()
    }

    /// Resolve an optional source reference to a committed `T`
    ///
    /// `None` resolves to `None`.
    ///
    /// # Errors
    /// [`MigrationError::ReferenceResolution`] when the key is present but
    /// nothing committed matches it
    pub fn resolve<T: Entity>(
        &self,
        source_id: Option<SourceId>,
    ) -> Result<Option<Ref<T>>, MigrationError> {
        let Some(source_id) = source_id else {
            return Ok(None);
        };
        self.lookup(T::KIND, source_id)
            .map(|id| Some(Ref::new(id)))
            .ok_or(MigrationError::ReferenceResolution {
                kind: T::KIND,
                source_id,
            })
    }

    /// Resolve a mandatory reference of an `owner` row
    ///
    /// # Errors
    /// [`TransformError::MissingReference`] when the row carries no key,
    /// otherwise as [`SourceIndex::resolve`]
    pub fn require<T: Entity>(
        &self,
        owner: EntityKind,
        field: &'static str,
        source_id: Option<SourceId>,
    ) -> Result<Ref<T>, MigrationError> {
        self.resolve(source_id)?
            .ok_or(MigrationError::Transform(TransformError::MissingReference {
                kind: owner,
                field,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devav_model::target::{Customer, Probation};

    #[test]
    fn null_resolves_to_none() {
        let index = SourceIndex::new();
        assert_eq!(index.resolve::<Probation>(None).unwrap(), None);
    }

    #[test]
    fn pending_entries_are_invisible_until_sealed() {
        let index = SourceIndex::new();
        index
            .register(EntityKind::Customer, SourceId(1), EntityId(10))
            .unwrap();
        assert!(matches!(
            index.resolve::<Customer>(Some(SourceId(1))),
            Err(MigrationError::ReferenceResolution {
                kind: EntityKind::Customer,
                ..
            })
        ));

        assert_eq!(index.seal(), 1);
        let r = index.resolve::<Customer>(Some(SourceId(1))).unwrap();
        assert_eq!(r.map(Ref::id), Some(EntityId(10)));
    }

    #[test]
    fn keys_are_scoped_per_kind() {
        let index = SourceIndex::new();
        index
            .register(EntityKind::Customer, SourceId(1), EntityId(10))
            .unwrap();
        index
            .register(EntityKind::Probation, SourceId(1), EntityId(11))
            .unwrap();
        index.seal();
        assert_eq!(index.lookup(EntityKind::Probation, SourceId(1)), Some(EntityId(11)));
        assert_eq!(index.committed_len(EntityKind::Customer), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let index = SourceIndex::new();
        index
            .register(EntityKind::Customer, SourceId(1), EntityId(10))
            .unwrap();
        assert!(index
            .register(EntityKind::Customer, SourceId(1), EntityId(11))
            .is_err());
        index.seal();
        assert!(matches!(
            index.register(EntityKind::Customer, SourceId(1), EntityId(12)),
            Err(MigrationError::DuplicateSourceId { .. })
        ));
    }

    #[test]
    fn discarded_entries_never_resolve() {
        let index = SourceIndex::new();
        index
            .register(EntityKind::Customer, SourceId(1), EntityId(10))
            .unwrap();
        assert_eq!(index.discard_pending(), 1);
        index.seal();
        assert!(index.resolve::<Customer>(Some(SourceId(1))).is_err());
    }

    #[test]
    fn required_reference_must_be_present() {
        let index = SourceIndex::new();
        let err = index
            .require::<Customer>(EntityKind::Order, "Customer", None)
            .unwrap_err();
        assert!(matches!(
            err,
            MigrationError::Transform(TransformError::MissingReference {
                kind: EntityKind::Order,
                field: "Customer"
            })
        ));
    }
}
