//! Aggregate cloner
//!
//! Duplicates every committed parent aggregate `factor` times. Fields are
//! copied through the clone descriptor the target store publishes for each
//! kind; descriptors are fetched once per kind and cached. Every parent
//! clone then receives the aggregate's overrides, and each child clone is
//! attached to its new parent. All clones are committed together at the
//! end.

use crate::error::MigrationError;
use chrono::{Duration, NaiveDateTime};
use devav_model::target::{Order, OrderItem, Quote, QuoteItem};
use devav_model::{Clonable, EntityKind, FieldDescriptor, FieldInfo, Ref};
use devav_store::{CommitReceipt, StoreError, TargetStore, TargetStoreExt};
use moka::future::Cache;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A parent kind together with the child kind it owns
pub trait Aggregate: Send + Sync + 'static {
    /// Owning entity
    type Parent: Clonable;
    /// Owned line item
    type Child: Clonable;

    /// Parent the child belongs to
    fn parent_of(child: &Self::Child) -> Option<Ref<Self::Parent>>;

    /// Point the child at `parent`
    fn attach(child: &mut Self::Child, parent: Ref<Self::Parent>);

    /// Rewrite the non-copied fields of clone number `index`
    fn apply_overrides(
        clone: &mut Self::Parent,
        source: &Self::Parent,
        index: usize,
        date_shift: Duration,
    );
}

fn shifted(date: NaiveDateTime, shift: Duration) -> NaiveDateTime {
    date.checked_add_signed(shift).unwrap_or(date)
}

/// Orders with their items; the order date shifts and the clone index
/// prefixes the invoice number
pub struct OrderAggregate;

impl Aggregate for OrderAggregate {
    type Parent = Order;
    type Child = OrderItem;

    fn parent_of(child: &OrderItem) -> Option<Ref<Order>> {
        child.order
    }

    fn attach(child: &mut OrderItem, parent: Ref<Order>) {
        child.order = Some(parent);
    }

    fn apply_overrides(clone: &mut Order, source: &Order, index: usize, date_shift: Duration) {
        clone.order_date = shifted(source.order_date, date_shift);
        clone.invoice_number = format!("{index}{}", source.invoice_number);
    }
}

/// Quotes with their items; same rules as orders
pub struct QuoteAggregate;

impl Aggregate for QuoteAggregate {
    type Parent = Quote;
    type Child = QuoteItem;

    fn parent_of(child: &QuoteItem) -> Option<Ref<Quote>> {
        child.quote
    }

    fn attach(child: &mut QuoteItem, parent: Ref<Quote>) {
        child.quote = Some(parent);
    }

    fn apply_overrides(clone: &mut Quote, source: &Quote, index: usize, date_shift: Duration) {
        clone.date = shifted(source.date, date_shift);
        clone.number = format!("{index}{}", source.number);
    }
}

/// Outcome of one cloning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneReport {
    /// Parent kind cloned
    pub parent: EntityKind,
    /// Parents found in the store
    pub source_parents: usize,
    /// Parent clones created
    pub parents_created: usize,
    /// Child clones created
    pub children_created: usize,
    /// Receipt of the single commit
    pub receipt: CommitReceipt,
}

/// Clones aggregates in a target store
pub struct Cloner {
    target: Arc<dyn TargetStore>,
    descriptors: Cache<EntityKind, Arc<Vec<FieldInfo>>>,
    date_shift: Duration,
}

impl std::fmt::Debug for Cloner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cloner")
            .field("cached_descriptors", &self.descriptors.entry_count())
            .field("date_shift", &self.date_shift)
            .finish_non_exhaustive()
    }
}

impl Cloner {
    /// Cloner over `target` with the default one-day-back date shift
    #[must_use]
    pub fn new(target: Arc<dyn TargetStore>) -> Self {
        Self {
            target,
            descriptors: Cache::new(EntityKind::ALL.len() as u64),
            date_shift: Duration::days(-1),
        }
    }

    /// With date shift in days
    #[must_use]
    pub fn with_date_shift_days(mut self, days: i64) -> Self {
        self.date_shift = Duration::days(days);
        self
    }

    async fn descriptor(&self, kind: EntityKind) -> Result<Arc<Vec<FieldInfo>>, MigrationError> {
        let target = Arc::clone(&self.target);
        self.descriptors
            .try_get_with(kind, async move {
                debug!(kind = %kind, "querying clone descriptor");
                target.clonable_fields(kind).await.map(Arc::new)
            })
            .await
            .map_err(|err: Arc<StoreError>| MigrationError::Clone {
                kind,
                detail: err.to_string(),
            })
    }

    /// Copiers for the fields in `T`'s descriptor
    async fn copiers<T: Clonable>(&self) -> Result<Vec<FieldDescriptor<T>>, MigrationError> {
        let fields = self.descriptor(T::KIND).await?;
        fields
            .iter()
            .map(|info| {
                T::fields()
                    .iter()
                    .find(|d| d.info.name == info.name)
                    .copied()
                    .ok_or_else(|| MigrationError::Clone {
                        kind: T::KIND,
                        detail: format!("descriptor names unknown field {}", info.name),
                    })
            })
            .collect()
    }

    /// Clone every committed aggregate of type `A` `factor` times
    ///
    /// A parent without children yields clones without children.
    /// `factor == 0` creates and commits nothing.
    ///
    /// # Errors
    /// [`MigrationError::Clone`] when a descriptor cannot be obtained,
    /// [`MigrationError::CloneCommit`] when the store rejects the batch; the
    /// batch is discarded in that case
    pub async fn clone_aggregates<A: Aggregate>(
        &self,
        factor: usize,
    ) -> Result<CloneReport, MigrationError> {
        let parent_kind = <A::Parent as devav_model::Entity>::KIND;
        let parents = self.target.all::<A::Parent>();
        let mut report = CloneReport {
            parent: parent_kind,
            source_parents: parents.len(),
            parents_created: 0,
            children_created: 0,
            receipt: CommitReceipt::default(),
        };
        if factor == 0 {
            return Ok(report);
        }

        let parent_fields = self.copiers::<A::Parent>().await?;
        let child_fields = self.copiers::<A::Child>().await?;

        let mut children: HashMap<Ref<A::Parent>, Vec<A::Child>> = HashMap::new();
        for (_, child) in self.target.all::<A::Child>() {
            if let Some(parent) = A::parent_of(&child) {
                children.entry(parent).or_default().push(child);
            }
        }

        for (parent_ref, parent) in &parents {
            let items = children.get(parent_ref).map_or(&[][..], Vec::as_slice);
            for index in 0..factor {
                let mut clone = A::Parent::default();
                for field in &parent_fields {
                    (field.copy)(&mut clone, parent);
                }
                A::apply_overrides(&mut clone, parent, index, self.date_shift);
                let new_parent = self.target.create(clone);
                report.parents_created += 1;

                for item in items {
                    let mut child = A::Child::default();
                    for field in &child_fields {
                        (field.copy)(&mut child, item);
                    }
                    A::attach(&mut child, new_parent);
                    self.target.create(child);
                    report.children_created += 1;
                }
            }
        }

        report.receipt = match self.target.commit().await {
            Ok(receipt) => receipt,
            Err(source) => {
                let discarded = self.target.discard();
                tracing::error!(kind = %parent_kind, error = %source, discarded, "clone commit failed");
                return Err(MigrationError::CloneCommit {
                    kind: parent_kind,
                    source,
                });
            }
        };

        info!(
            kind = %parent_kind,
            factor,
            parents = report.parents_created,
            children = report.children_created,
            "aggregates cloned"
        );
        Ok(report)
    }
}

/// Clone every order with its items `factor` times
///
/// # Errors
/// As [`Cloner::clone_aggregates`]
pub async fn generate_clones(
    target: Arc<dyn TargetStore>,
    factor: usize,
) -> Result<CloneReport, MigrationError> {
    Cloner::new(target)
        .clone_aggregates::<OrderAggregate>(factor)
        .await
}

/// Clone every quote with its items `factor` times
///
/// # Errors
/// As [`Cloner::clone_aggregates`]
pub async fn generate_quote_clones(
    target: Arc<dyn TargetStore>,
    factor: usize,
) -> Result<CloneReport, MigrationError> {
    Cloner::new(target)
        .clone_aggregates::<QuoteAggregate>(factor)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use devav_store::MemoryTargetStore;

    fn date(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn order_overrides() {
        let source = Order {
            invoice_number: "INV-1".into(),
            order_date: date(10),
            ..Order::default()
        };
        let mut clone = Order::default();
        OrderAggregate::apply_overrides(&mut clone, &source, 3, Duration::days(-1));
        assert_eq!(clone.invoice_number, "3INV-1");
        assert_eq!(clone.order_date, date(9));
    }

    #[tokio::test]
    async fn factor_zero_is_a_no_op() {
        let store = Arc::new(MemoryTargetStore::new());
        store.create(Order::default());
        store.commit().await.unwrap();

        let report = generate_clones(store.clone(), 0).await.unwrap();
        assert_eq!(report.source_parents, 1);
        assert_eq!(report.parents_created, 0);
        assert_eq!(store.version(), 1);
        assert_eq!(store.schema_queries(), 0);
    }

    #[tokio::test]
    async fn quotes_clone_with_their_items() {
        let store = Arc::new(MemoryTargetStore::new());
        let quote = store.create(Quote {
            number: "Q7".into(),
            date: date(5),
            ..Quote::default()
        });
        store.create(QuoteItem {
            quote: Some(quote),
            product_units: 2,
            ..QuoteItem::default()
        });
        store.commit().await.unwrap();

        let report = generate_quote_clones(store.clone(), 2).await.unwrap();
        assert_eq!(report.parents_created, 2);
        assert_eq!(report.children_created, 2);

        let numbers: Vec<String> = store
            .all::<Quote>()
            .into_iter()
            .map(|(_, q)| q.number)
            .collect();
        assert_eq!(numbers, vec!["Q7", "0Q7", "1Q7"]);
        for (r, q) in store.all::<Quote>().into_iter().skip(1) {
            assert_eq!(q.date, date(4));
            let items = store
                .all::<QuoteItem>()
                .into_iter()
                .filter(|(_, i)| i.quote == Some(r))
                .count();
            assert_eq!(items, 1);
        }
    }
}
