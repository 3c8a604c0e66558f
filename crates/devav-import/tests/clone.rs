//! Aggregate cloning over an imported dataset

use devav_import::{generate_clones, import_all, Cloner, MigrationError, OrderAggregate};
use devav_model::target::{Order, OrderItem};
use devav_model::{EntityKind, Ref};
use devav_store::{MemorySourceStore, MemoryTargetStore, TargetStore, TargetStoreExt};
use devav_test_utils::{acme_snapshot, at, FailingCommitStore, ORDER};
use pretty_assertions::assert_eq;
use std::sync::Arc;

async fn imported() -> Arc<MemoryTargetStore> {
    let target = Arc::new(MemoryTargetStore::new());
    import_all(
        target.clone(),
        Arc::new(MemorySourceStore::new(acme_snapshot())),
    )
    .await
    .unwrap();
    target
}

#[tokio::test]
async fn orders_are_cloned_with_shifted_dates_and_prefixed_invoices() {
    let target = imported().await;
    let version = target.version();
    let (original_ref, original) = target.all::<Order>().into_iter().next().unwrap();

    let report = generate_clones(target.clone(), 3).await.unwrap();
    assert_eq!(report.source_parents, 1);
    assert_eq!(report.parents_created, 3);
    assert_eq!(report.children_created, 3);
    assert_eq!(target.version(), version + 1);

    let clones: Vec<_> = target
        .all::<Order>()
        .into_iter()
        .filter(|(r, _)| *r != original_ref)
        .collect();
    let invoices: Vec<&str> = clones
        .iter()
        .map(|(_, o)| o.invoice_number.as_str())
        .collect();
    assert_eq!(invoices, vec!["0INV-1", "1INV-1", "2INV-1"]);

    let items = target.all::<OrderItem>();
    for (clone_ref, clone) in &clones {
        assert_eq!(clone.order_date, at(2024, 1, 31));
        assert_eq!(clone.source_id, None);
        assert_eq!(clone.customer, original.customer);
        assert_eq!(clone.store, original.store);
        assert_eq!(clone.employee, original.employee);

        let children: Vec<_> = items
            .iter()
            .filter(|(_, i)| i.order == Some(*clone_ref))
            .collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].1.product_units, 2);
        assert_eq!(children[0].1.source_id, None);
    }

    // the original keeps its key and its item
    assert_eq!(original.source_id, Some(ORDER));
    assert_eq!(
        items
            .iter()
            .filter(|(_, i)| i.order == Some(original_ref))
            .count(),
        1
    );
}

#[tokio::test]
async fn childless_orders_clone_without_items() {
    let target = Arc::new(MemoryTargetStore::new());
    target.create(Order {
        invoice_number: "EMPTY".into(),
        order_date: at(2024, 5, 2),
        ..Order::default()
    });
    target.commit().await.unwrap();

    let report = generate_clones(target.clone(), 2).await.unwrap();
    assert_eq!(report.parents_created, 2);
    assert_eq!(report.children_created, 0);
    assert_eq!(target.all::<Order>().len(), 3);
    assert!(target.all::<OrderItem>().is_empty());
}

#[tokio::test]
async fn descriptors_are_fetched_once_per_kind() {
    let target = imported().await;
    let cloner = Cloner::new(target.clone());

    cloner.clone_aggregates::<OrderAggregate>(1).await.unwrap();
    cloner.clone_aggregates::<OrderAggregate>(1).await.unwrap();

    assert_eq!(target.schema_queries(), 2);
    assert_eq!(target.all::<Order>().len(), 4);
}

#[tokio::test]
async fn rejected_clone_batch_is_discarded() {
    let target = Arc::new(FailingCommitStore::new(2));
    target.create(Order {
        invoice_number: "INV-9".into(),
        ..Order::default()
    });
    target.commit().await.unwrap();

    let err = generate_clones(target.clone(), 2).await.unwrap_err();
    assert!(matches!(
        err,
        MigrationError::CloneCommit {
            kind: EntityKind::Order,
            ..
        }
    ));
    assert_eq!(target.pending_count(), 0);
    assert_eq!(target.inner().committed_count(EntityKind::Order), 1);
}

#[tokio::test]
async fn every_clone_receives_all_items_of_its_source() {
    let target = Arc::new(MemoryTargetStore::new());
    let big = target.create(Order {
        invoice_number: "BIG".into(),
        order_date: at(2024, 6, 10),
        ..Order::default()
    });
    for units in [1, 2, 3] {
        target.create(OrderItem {
            order: Some(big),
            product_units: units,
            ..OrderItem::default()
        });
    }
    let small = target.create(Order {
        invoice_number: "SMALL".into(),
        order_date: at(2024, 6, 11),
        ..Order::default()
    });
    target.create(OrderItem {
        order: Some(small),
        product_units: 9,
        ..OrderItem::default()
    });
    target.commit().await.unwrap();

    let report = generate_clones(target.clone(), 3).await.unwrap();
    assert_eq!(report.parents_created, 6);
    assert_eq!(report.children_created, 12);

    let items = target.all::<OrderItem>();
    let units_of = |parent: Ref<Order>| {
        let mut units: Vec<i32> = items
            .iter()
            .filter(|(_, i)| i.order == Some(parent))
            .map(|(_, i)| i.product_units)
            .collect();
        units.sort_unstable();
        units
    };

    for (source, expected) in [("BIG", vec![1, 2, 3]), ("SMALL", vec![9])] {
        let clones: Vec<_> = target
            .all::<Order>()
            .into_iter()
            .filter(|(_, o)| o.invoice_number.ends_with(source) && o.invoice_number != source)
            .collect();
        assert_eq!(clones.len(), 3);
        for (clone_ref, _) in clones {
            assert_eq!(units_of(clone_ref), expected);
        }
    }

    // originals keep exactly their own items
    assert_eq!(units_of(big), vec![1, 2, 3]);
    assert_eq!(units_of(small), vec![9]);
    assert_eq!(items.len(), 16);
}
