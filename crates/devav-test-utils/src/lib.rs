//! Testing utilities for the DevAV migration workspace
//!
//! Shared fixtures and store wrappers.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use devav_model::source::{
    CrestRow, CustomerCommunicationRow, CustomerEmployeeRow, CustomerRow, CustomerStoreRow,
    EmployeeRow, EmployeeTaskRow, EvaluationRow, OrderItemRow, OrderRow, PictureRow,
    ProbationRow, ProductCatalogRow, ProductImageRow, ProductRow, QuoteItemRow, QuoteRow,
    SourceAddress, StateRow, TaskAttachedFileRow,
};
use devav_model::{AnyEntity, EntityId, EntityKind, FieldInfo, SourceId};
use devav_store::{CommitReceipt, MemoryTargetStore, SourceSnapshot, StoreError, TargetStore};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ACME: SourceId = SourceId(1);
pub const ACME_STORE: SourceId = SourceId(10);
pub const JANE: SourceId = SourceId(100);
pub const BOB: SourceId = SourceId(101);
pub const PROBATION_LATE: SourceId = SourceId(200);
pub const ORDER: SourceId = SourceId(1000);
pub const QUOTE: SourceId = SourceId(2000);

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

pub fn address_in(state: &str) -> SourceAddress {
    SourceAddress {
        line: "2900 W Alameda Ave".into(),
        city: "Glendale".into(),
        state: state.into(),
        zip_code: "91505".into(),
        latitude: 34.155,
        longitude: -118.331,
    }
}

pub fn employee(id: SourceId, first_name: &str) -> EmployeeRow {
    EmployeeRow {
        id,
        first_name: first_name.into(),
        last_name: "Doe".into(),
        full_name: format!("{first_name} Doe"),
        prefix: 3,
        department: 1,
        status: 0,
        address: address_in("CA"),
        ..EmployeeRow::default()
    }
}

pub fn order_item(id: i64, order: SourceId, units: i32) -> OrderItemRow {
    OrderItemRow {
        id: SourceId(id),
        order: Some(order),
        product: Some(SourceId(1)),
        product_units: units,
        product_price: 1_000.0,
        total: f64::from(units) * 1_000.0,
        ..OrderItemRow::default()
    }
}

/// The Acme dataset: one row or more for every legacy collection
///
/// Acme (CA) owns one store; Jane sells it one order with one item.
pub fn acme_snapshot() -> SourceSnapshot {
    let mut s = SourceSnapshot::default();

    s.crests.push(CrestRow {
        id: SourceId(1),
        city_name: "Glendale".into(),
        ..CrestRow::default()
    });
    s.states.push(StateRow {
        short_name: "CA".into(),
        long_name: "California".into(),
        ..StateRow::default()
    });
    s.customers.push(CustomerRow {
        id: ACME,
        name: "Acme".into(),
        status: 0,
        billing_address: address_in("CA"),
        home_office: address_in("CA"),
        ..CustomerRow::default()
    });
    s.pictures.push(PictureRow {
        id: SourceId(1),
        data: vec![0x89, 0x50, 0x4e, 0x47],
    });
    s.probations.push(ProbationRow {
        id: PROBATION_LATE,
        reason: "Repeated late arrivals".into(),
    });

    s.customer_stores.push(CustomerStoreRow {
        id: ACME_STORE,
        customer: Some(ACME),
        crest: Some(SourceId(1)),
        location: "Glendale".into(),
        address: address_in("CA"),
        ..CustomerStoreRow::default()
    });
    s.employees.push(EmployeeRow {
        picture: Some(SourceId(1)),
        ..employee(JANE, "Jane")
    });
    s.employees.push(EmployeeRow {
        probation_reason: Some(PROBATION_LATE),
        ..employee(BOB, "Bob")
    });

    s.evaluations.push(EvaluationRow {
        id: SourceId(1),
        employee: Some(BOB),
        created_by: Some(JANE),
        created_on: at(2024, 1, 15),
        subject: "Annual review".into(),
        details: "Raise: Yes\nBonus: No".into(),
        rating: 2,
    });
    s.products.push(ProductRow {
        id: SourceId(1),
        name: "HD Video Player".into(),
        category: 5,
        engineer: Some(JANE),
        support: Some(BOB),
        primary_image: Some(SourceId(1)),
        ..ProductRow::default()
    });
    s.orders.push(OrderRow {
        id: ORDER,
        invoice_number: "INV-1".into(),
        order_date: at(2024, 2, 1),
        customer: Some(ACME),
        store: Some(ACME_STORE),
        employee: Some(JANE),
        shipment_courier: 1,
        shipment_status: 0,
        ..OrderRow::default()
    });
    s.quotes.push(QuoteRow {
        id: QUOTE,
        number: "Q-1".into(),
        date: at(2024, 1, 20),
        customer: Some(ACME),
        customer_store: Some(ACME_STORE),
        employee: Some(JANE),
        ..QuoteRow::default()
    });
    s.customer_employees.push(CustomerEmployeeRow {
        id: SourceId(1),
        first_name: "Wile".into(),
        last_name: "Coyote".into(),
        full_name: "Wile Coyote".into(),
        prefix: 2,
        picture: Some(SourceId(1)),
        customer: Some(ACME),
        customer_store: Some(ACME_STORE),
        ..CustomerEmployeeRow::default()
    });

    s.product_images.push(ProductImageRow {
        id: SourceId(1),
        product: Some(SourceId(1)),
        picture: Some(SourceId(1)),
    });
    s.product_catalogs.push(ProductCatalogRow {
        id: SourceId(1),
        product: Some(SourceId(1)),
        pdf: b"%PDF".to_vec(),
    });
    s.order_items.push(order_item(1, ORDER, 2));
    s.quote_items.push(QuoteItemRow {
        id: SourceId(1),
        quote: Some(QUOTE),
        product: Some(SourceId(1)),
        product_units: 5,
        ..QuoteItemRow::default()
    });
    s.customer_communications.push(CustomerCommunicationRow {
        id: SourceId(1),
        employee: Some(JANE),
        customer_employee: Some(SourceId(1)),
        date: at(2024, 1, 5),
        purpose: "Follow up".into(),
        kind: "Phone".into(),
    });
    s.employee_tasks.push(EmployeeTaskRow {
        id: SourceId(1),
        subject: "Prepare quote".into(),
        status: 2,
        priority: 1,
        follow_up: 0,
        owner: Some(JANE),
        customer_employee: Some(SourceId(1)),
        assigned_employees: vec![JANE, BOB],
        ..EmployeeTaskRow::default()
    });

    s.task_attached_files.push(TaskAttachedFileRow {
        id: SourceId(1),
        name: "quote.pdf".into(),
        content: b"%PDF".to_vec(),
        employee_task: Some(SourceId(1)),
    });

    s
}

/// In-memory target store whose n-th commit fails
///
/// Commits are counted from 1, empty ones included. The failing commit
/// applies nothing and leaves the batch pending, like a rejected commit.
#[derive(Debug, Default)]
pub struct FailingCommitStore {
    inner: MemoryTargetStore,
    fail_on: usize,
    attempts: AtomicUsize,
}

impl FailingCommitStore {
    pub fn new(fail_on: usize) -> Self {
        Self {
            inner: MemoryTargetStore::new(),
            fail_on,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryTargetStore {
        &self.inner
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TargetStore for FailingCommitStore {
    fn insert(&self, entity: AnyEntity) -> EntityId {
        self.inner.insert(entity)
    }

    fn fetch(&self, kind: EntityKind, id: EntityId) -> Option<AnyEntity> {
        self.inner.fetch(kind, id)
    }

    fn scan(&self, kind: EntityKind) -> Vec<(EntityId, AnyEntity)> {
        self.inner.scan(kind)
    }

    fn pending_count(&self) -> usize {
        self.inner.pending_count()
    }

    fn discard(&self) -> usize {
        self.inner.discard()
    }

    async fn commit(&self) -> Result<CommitReceipt, StoreError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == self.fail_on {
            return Err(StoreError::Unavailable(format!(
                "injected failure on commit {attempt}"
            )));
        }
        self.inner.commit().await
    }

    async fn clonable_fields(&self, kind: EntityKind) -> Result<Vec<FieldInfo>, StoreError> {
        self.inner.clonable_fields(kind).await
    }
}
