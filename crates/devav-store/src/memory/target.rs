//! In-memory target store
//!
//! Pending creations live in a concurrent map so import tasks can insert
//! without coordination. Commit validates the whole batch under the write
//! lock of the committed tables and applies it only if every check passes.

use crate::error::StoreError;
use crate::target::{CommitReceipt, TargetStore};
use async_trait::async_trait;
use dashmap::DashMap;
use devav_model::{clonable_fields_of, AnyEntity, EntityId, EntityKind, FieldInfo, SourceId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Committed {
    tables: HashMap<EntityKind, BTreeMap<EntityId, AnyEntity>>,
    kinds: HashMap<EntityId, EntityKind>,
    source_keys: HashSet<(EntityKind, SourceId)>,
    version: u64,
}

/// Target store held entirely in memory
#[derive(Debug)]
pub struct MemoryTargetStore {
    next_id: AtomicU64,
    pending: DashMap<EntityId, AnyEntity>,
    committed: RwLock<Committed>,
    schema_queries: AtomicUsize,
}

impl Default for MemoryTargetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTargetStore {
    /// Empty store; identities start at 1
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            pending: DashMap::new(),
            committed: RwLock::new(Committed::default()),
            schema_queries: AtomicUsize::new(0),
        }
    }

    /// Number of successful non-empty commits
    #[must_use]
    pub fn version(&self) -> u64 {
        self.committed.read().version
    }

    /// Number of committed entities of `kind`
    #[must_use]
    pub fn committed_count(&self, kind: EntityKind) -> usize {
        self.committed.read().tables.get(&kind).map_or(0, BTreeMap::len)
    }

    /// Number of clone-schema queries answered
    #[must_use]
    pub fn schema_queries(&self) -> usize {
        self.schema_queries.load(Ordering::Relaxed)
    }

    fn validate(committed: &Committed, batch: &[(EntityId, AnyEntity)]) -> Result<(), StoreError> {
        let batch_kinds: HashMap<EntityId, EntityKind> =
            batch.iter().map(|(id, e)| (*id, e.kind())).collect();
        let mut batch_keys = HashSet::new();

        for (id, entity) in batch {
            let kind = entity.kind();
            for r in entity.references() {
                let target = committed
                    .kinds
                    .get(&r.id)
                    .or_else(|| batch_kinds.get(&r.id));
                match target {
                    Some(found) if *found == r.kind => {}
                    Some(found) => {
                        return Err(StoreError::ConstraintViolation {
                            kind,
                            detail: format!(
                                "{id} references {} as {} but it is a {found}",
                                r.id, r.kind
                            ),
                        });
                    }
                    None => {
                        return Err(StoreError::ConstraintViolation {
                            kind,
                            detail: format!("{id} references missing {} {}", r.kind, r.id),
                        });
                    }
                }
            }

            if let Some(source_id) = entity.source_id() {
                let key = (kind, source_id);
                if committed.source_keys.contains(&key) || !batch_keys.insert(key) {
                    return Err(StoreError::ConstraintViolation {
                        kind,
                        detail: format!("duplicate SourceId {source_id}"),
                    });
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TargetStore for MemoryTargetStore {
    fn insert(&self, entity: AnyEntity) -> EntityId {
        let id = EntityId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.pending.insert(id, entity);
        id
    }

    fn fetch(&self, kind: EntityKind, id: EntityId) -> Option<AnyEntity> {
        if let Some(entity) = self.pending.get(&id) {
            return (entity.kind() == kind).then(|| entity.clone());
        }
        self.committed
            .read()
            .tables
            .get(&kind)
            .and_then(|table| table.get(&id))
            .cloned()
    }

    fn scan(&self, kind: EntityKind) -> Vec<(EntityId, AnyEntity)> {
        let mut rows: BTreeMap<EntityId, AnyEntity> = self
            .committed
            .read()
            .tables
            .get(&kind)
            .cloned()
            .unwrap_or_default();
        for entry in &self.pending {
            if entry.value().kind() == kind {
                rows.insert(*entry.key(), entry.value().clone());
            }
        }
        rows.into_iter().collect()
    }

    fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn discard(&self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "discarded pending creations");
        }
        dropped
    }

    async fn commit(&self) -> Result<CommitReceipt, StoreError> {
        let mut committed = self.committed.write();

        let mut batch: Vec<(EntityId, AnyEntity)> = self
            .pending
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        if batch.is_empty() {
            return Ok(CommitReceipt {
                version: committed.version,
                created: BTreeMap::new(),
            });
        }
        batch.sort_by_key(|(id, _)| *id);

        Self::validate(&committed, &batch)?;

        let mut created = BTreeMap::new();
        for (id, entity) in batch {
            self.pending.remove(&id);
            let kind = entity.kind();
            if let Some(source_id) = entity.source_id() {
                committed.source_keys.insert((kind, source_id));
            }
            committed.kinds.insert(id, kind);
            committed.tables.entry(kind).or_default().insert(id, entity);
            *created.entry(kind).or_insert(0) += 1;
        }
        committed.version += 1;

        let receipt = CommitReceipt {
            version: committed.version,
            created,
        };
        tracing::debug!(version = receipt.version, total = receipt.total(), "commit applied");
        Ok(receipt)
    }

    async fn clonable_fields(&self, kind: EntityKind) -> Result<Vec<FieldInfo>, StoreError> {
        self.schema_queries.fetch_add(1, Ordering::Relaxed);
        clonable_fields_of(kind).ok_or(StoreError::SchemaUnavailable(kind))
    }
}
