//! Per-kind importers
//!
//! Each kind is described by a [`Transform`]: the source row it reads, the
//! target entity it builds, the kinds it references and the pure mapping
//! from one to the other. [`TransformJob`] turns any `Transform` into an
//! object-safe [`ImportJob`] that streams the collection, creates one
//! target entity per row and registers it in the [`SourceIndex`].

mod customers;
mod employees;
mod products;
mod reference;
mod sales;

pub use customers::{
    CustomerCommunicationImport, CustomerEmployeeImport, CustomerImport, CustomerStoreImport,
};
pub use employees::{
    EmployeeImport, EmployeeTaskImport, EvaluationImport, ProbationImport, TaskAttachedFileImport,
};
pub use products::{ProductCatalogImport, ProductImageImport, ProductImport};
pub use reference::{CrestImport, PictureImport, StateImport};
pub use sales::{OrderImport, OrderItemImport, QuoteImport, QuoteItemImport};

use crate::error::MigrationError;
use crate::resolver::SourceIndex;
use async_trait::async_trait;
use devav_model::source::SourceAddress;
use devav_model::target::Address;
use devav_model::{Entity, EntityKind, Ref, SourceId, SourceRow, StateCode, TransformError};
use devav_store::{SourceQuery, SourceStore, SourceStoreExt, TargetStore, TargetStoreExt};
use futures::StreamExt;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Mapping from one legacy collection to one target kind
pub trait Transform: Send + Sync + 'static {
    /// Legacy row read
    type Row: SourceRow;
    /// Entity created per row
    type Target: Entity;

    /// Kinds referenced by the target entity
    const DEPENDS_ON: &'static [EntityKind];

    /// Reference fields loaded eagerly with each row
    const INCLUDES: &'static [&'static str] = &[];

    /// Build the target entity for `row`
    ///
    /// # Errors
    /// [`MigrationError::Transform`] for uncoercible values,
    /// [`MigrationError::ReferenceResolution`] for dangling references
    fn transform(row: Self::Row, cx: &TransformContext<'_>) -> Result<Self::Target, MigrationError>;
}

/// What a transform may touch while mapping one row
pub struct TransformContext<'a> {
    index: &'a SourceIndex,
    target: &'a dyn TargetStore,
}

impl<'a> TransformContext<'a> {
    /// Context over a session index and target store
    #[must_use]
    pub fn new(index: &'a SourceIndex, target: &'a dyn TargetStore) -> Self {
        Self { index, target }
    }

    /// Resolve an optional reference
    ///
    /// # Errors
    /// As [`SourceIndex::resolve`]
    pub fn resolve<T: Entity>(
        &self,
        source_id: Option<SourceId>,
    ) -> Result<Option<Ref<T>>, MigrationError> {
        self.index.resolve(source_id)
    }

    /// Resolve a mandatory reference of an `owner` row
    ///
    /// # Errors
    /// As [`SourceIndex::require`]
    pub fn require<T: Entity>(
        &self,
        owner: EntityKind,
        field: &'static str,
        source_id: Option<SourceId>,
    ) -> Result<Ref<T>, MigrationError> {
        self.index.require(owner, field, source_id)
    }

    /// Create an entity owned by the row being transformed
    ///
    /// Owned entities have no legacy key and are not indexed.
    pub fn create_owned<T: Entity>(&self, entity: T) -> Ref<T> {
        self.target.create(entity)
    }
}

/// Parse a legacy address, state included
pub(crate) fn address(source: SourceAddress) -> Result<Address, TransformError> {
    Ok(Address {
        state: StateCode::from_short_name(&source.state)?,
        line: source.line,
        city: source.city,
        zip_code: source.zip_code,
        latitude: source.latitude,
        longitude: source.longitude,
    })
}

/// Shared handles given to every import task of a run
#[derive(Clone)]
pub struct ImportContext {
    /// Legacy store
    pub source: Arc<dyn SourceStore>,
    /// Destination store
    pub target: Arc<dyn TargetStore>,
    /// Session SourceId index
    pub index: Arc<SourceIndex>,
    /// Records between cooperative yields
    pub yield_interval: usize,
}

/// Outcome of one import task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Kind imported
    pub kind: EntityKind,
    /// Source records read, one target entity each
    pub records: usize,
    /// Wall time of the task
    pub elapsed: Duration,
}

/// One kind's import, object safe
#[async_trait]
pub trait ImportJob: Send + Sync {
    /// Kind imported
    fn kind(&self) -> EntityKind;

    /// Kinds that must be committed first
    fn depends_on(&self) -> &'static [EntityKind];

    /// Source query issued by the task
    fn query(&self) -> SourceQuery;

    /// Stream the collection and create one entity per record
    ///
    /// # Errors
    /// [`MigrationError::Config`] when `cx.yield_interval` is zero, then
    /// the first source, transform, resolution or registration failure
    async fn run(&self, cx: ImportContext) -> Result<ImportStats, MigrationError>;
}

/// [`ImportJob`] driving a [`Transform`]
pub struct TransformJob<X> {
    _marker: PhantomData<fn() -> X>,
}

impl<X> TransformJob<X> {
    /// Job for transform `X`
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<X> Default for TransformJob<X> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<X: Transform> ImportJob for TransformJob<X> {
    fn kind(&self) -> EntityKind {
        <X::Target as Entity>::KIND
    }

    fn depends_on(&self) -> &'static [EntityKind] {
        X::DEPENDS_ON
    }

    fn query(&self) -> SourceQuery {
        X::INCLUDES
            .iter()
            .fold(SourceQuery::all(<X::Row as SourceRow>::KIND), |q, field| q.include(*field))
    }

    async fn run(&self, cx: ImportContext) -> Result<ImportStats, MigrationError> {
        let kind = self.kind();
        if cx.yield_interval == 0 {
            return Err(MigrationError::Config(format!(
                "{kind} import needs a yield interval greater than zero"
            )));
        }
        let started = Instant::now();
        let tcx = TransformContext::new(&cx.index, cx.target.as_ref());
        let mut rows = cx.source.rows::<X::Row>(self.query());
        let mut records = 0usize;

        while let Some(row) = rows.next().await {
            let entity = X::transform(row?, &tcx)?;
            let source_id = entity
                .source_id()
                .ok_or(MigrationError::MissingSourceId(kind))?;
            let id = cx.target.insert(entity.into_any());
            cx.index.register(kind, source_id, id)?;

            records += 1;
            if records % cx.yield_interval == 0 {
                tokio::task::yield_now().await;
            }
        }

        let stats = ImportStats {
            kind,
            records,
            elapsed: started.elapsed(),
        };
        tracing::debug!(kind = %kind, records, "import task finished");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devav_model::source::{CustomerStoreRow, ProbationRow};
    use devav_model::target::{Customer, CustomerStore};
    use devav_model::EntityId;
    use devav_store::{MemorySourceStore, MemoryTargetStore, SourceSnapshot};

    fn context(snapshot: SourceSnapshot) -> ImportContext {
        ImportContext {
            source: Arc::new(MemorySourceStore::new(snapshot)),
            target: Arc::new(MemoryTargetStore::new()),
            index: Arc::new(SourceIndex::new()),
            yield_interval: 1,
        }
    }

    #[test]
    fn address_state_is_parsed_exactly() {
        let parsed = address(SourceAddress {
            city: "Los Angeles".into(),
            state: "CA".into(),
            ..SourceAddress::default()
        })
        .unwrap();
        assert_eq!(parsed.state, StateCode::CA);
        assert_eq!(parsed.city, "Los Angeles");

        let err = address(SourceAddress {
            state: "California".into(),
            ..SourceAddress::default()
        })
        .unwrap_err();
        assert_eq!(err, TransformError::UnknownState("California".into()));
    }

    #[test]
    fn query_carries_includes() {
        let job = TransformJob::<CustomerStoreImport>::new();
        let query = job.query();
        assert_eq!(query.kind, EntityKind::CustomerStore);
        assert_eq!(query.includes, vec!["Customer", "Crest"]);
        assert_eq!(job.depends_on(), &[EntityKind::Customer, EntityKind::Crest]);
    }

    #[tokio::test]
    async fn job_creates_and_registers_each_row() {
        let mut snapshot = SourceSnapshot::default();
        for id in 1..=3 {
            snapshot.probations.push(ProbationRow {
                id: SourceId(id),
                reason: format!("reason {id}"),
            });
        }
        let cx = context(snapshot);
        let stats = TransformJob::<ProbationImport>::new()
            .run(cx.clone())
            .await
            .unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(cx.target.pending_count(), 3);
        assert_eq!(cx.index.seal(), 3);
        assert!(cx.index.lookup(EntityKind::Probation, SourceId(2)).is_some());
    }

    #[tokio::test]
    async fn zero_yield_interval_is_rejected() {
        let mut snapshot = SourceSnapshot::default();
        snapshot.probations.push(ProbationRow {
            id: SourceId(1),
            reason: "late".into(),
        });
        let cx = ImportContext {
            yield_interval: 0,
            ..context(snapshot)
        };
        let err = TransformJob::<ProbationImport>::new()
            .run(cx.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::Config(_)));
        assert_eq!(cx.target.pending_count(), 0);
    }

    #[tokio::test]
    async fn unresolved_reference_fails_the_job() {
        let mut snapshot = SourceSnapshot::default();
        snapshot.customer_stores.push(CustomerStoreRow {
            id: SourceId(1),
            customer: Some(SourceId(77)),
            ..CustomerStoreRow::default()
        });
        let cx = context(snapshot);
        let err = TransformJob::<CustomerStoreImport>::new()
            .run(cx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MigrationError::ReferenceResolution {
                kind: EntityKind::Customer,
                source_id: SourceId(77)
            }
        ));
    }

    #[test]
    fn owned_entities_bypass_the_index() {
        let index = SourceIndex::new();
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);
        let customer: Ref<Customer> = cx.create_owned(Customer::default());
        assert_eq!(customer.id(), EntityId(1));
        assert_eq!(index.seal(), 0);
        let _: Option<Ref<CustomerStore>> = cx.resolve(None).unwrap();
    }
}
