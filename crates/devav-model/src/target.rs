//! Entities of the target store
//!
//! Each entity mirrors the legacy key in `source_id` so the migration can
//! correlate it back to its source row. References to other entities are
//! typed [`Ref`]s holding store identities.

use crate::enums::{
    Bonus, CustomerStatus, EmployeeDepartment, EmployeeStatus, EmployeeTaskFollowUp,
    EmployeeTaskPriority, EmployeeTaskStatus, EvaluationRating, PersonPrefix, ProductCategory,
    Raise, ShipmentCourier, ShipmentStatus, StateCode,
};
use crate::ids::{AnyRef, Ref, SourceId};
use crate::kind::EntityKind;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Debug;

/// A target-store entity type
pub trait Entity: Clone + Default + Debug + Send + Sync + 'static {
    /// Kind tag
    const KIND: EntityKind;

    /// Mirrored legacy key, if the entity was imported
    fn source_id(&self) -> Option<SourceId>;

    /// Every outgoing reference held by this entity
    fn references(&self) -> Vec<AnyRef>;

    /// Erase into the kind-tagged container
    fn into_any(self) -> AnyEntity;

    /// Recover from the kind-tagged container
    fn from_any(any: AnyEntity) -> Option<Self>;
}

/// Postal address with a parsed state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub line: String,
    pub city: String,
    pub state: StateCode,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Crest {
    pub source_id: Option<SourceId>,
    pub city_name: String,
    pub large_image: Vec<u8>,
    pub small_image: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub source_id: Option<SourceId>,
    pub short_name: StateCode,
    pub long_name: String,
    pub large_flag: Vec<u8>,
    pub small_flag: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Customer {
    pub source_id: Option<SourceId>,
    pub name: String,
    pub phone: String,
    pub fax: String,
    pub website: String,
    pub status: CustomerStatus,
    pub annual_revenue: f64,
    pub total_employees: i32,
    pub total_stores: i32,
    pub profile: String,
    pub logo: Vec<u8>,
    pub billing_address: Address,
    pub home_office: Address,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Picture {
    pub source_id: Option<SourceId>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Probation {
    pub source_id: Option<SourceId>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerStore {
    pub source_id: Option<SourceId>,
    pub customer: Option<Ref<Customer>>,
    pub crest: Option<Ref<Crest>>,
    pub phone: String,
    pub fax: String,
    pub location: String,
    pub address: Address,
    pub annual_sales: f64,
    pub square_footage: i32,
    pub total_employees: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Employee {
    pub source_id: Option<SourceId>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub prefix: PersonPrefix,
    pub title: String,
    pub department: EmployeeDepartment,
    pub status: EmployeeStatus,
    pub email: String,
    pub skype: String,
    pub home_phone: String,
    pub mobile_phone: String,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub personal_profile: String,
    pub address: Address,
    pub picture: Option<Ref<Picture>>,
    pub probation_reason: Option<Ref<Probation>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub source_id: Option<SourceId>,
    pub employee: Option<Ref<Employee>>,
    pub manager: Option<Ref<Employee>>,
    pub subject: String,
    pub description: String,
    pub start_on: NaiveDateTime,
    pub end_on: NaiveDateTime,
    pub rating: EvaluationRating,
    pub raise: Raise,
    pub bonus: Bonus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub source_id: Option<SourceId>,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub available: bool,
    pub backorder: i32,
    pub cost: f64,
    pub sale_price: f64,
    pub retail_price: f64,
    pub consumer_rating: f64,
    pub current_inventory: i32,
    pub manufacturing: i32,
    pub weight: f64,
    pub image: Vec<u8>,
    pub production_start: NaiveDateTime,
    pub engineer: Option<Ref<Employee>>,
    pub support: Option<Ref<Employee>>,
    pub primary_image: Option<Ref<Picture>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductImage {
    pub source_id: Option<SourceId>,
    pub product: Option<Ref<Product>>,
    pub picture: Option<Ref<Picture>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCatalog {
    pub source_id: Option<SourceId>,
    pub product: Option<Ref<Product>>,
    pub pdf: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub source_id: Option<SourceId>,
    pub invoice_number: String,
    pub order_date: NaiveDateTime,
    pub ship_date: Option<NaiveDateTime>,
    pub customer: Option<Ref<Customer>>,
    pub store: Option<Ref<CustomerStore>>,
    pub employee: Option<Ref<Employee>>,
    pub po_number: String,
    pub order_terms: String,
    pub comments: String,
    pub sale_amount: f64,
    pub shipping_amount: f64,
    pub total_amount: f64,
    pub payment_total: f64,
    pub refund_total: f64,
    pub shipment_courier: ShipmentCourier,
    pub shipment_status: ShipmentStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderItem {
    pub source_id: Option<SourceId>,
    pub order: Option<Ref<Order>>,
    pub product: Option<Ref<Product>>,
    pub product_units: i32,
    pub product_price: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quote {
    pub source_id: Option<SourceId>,
    pub number: String,
    pub date: NaiveDateTime,
    pub customer: Option<Ref<Customer>>,
    pub customer_store: Option<Ref<CustomerStore>>,
    pub employee: Option<Ref<Employee>>,
    pub sub_total: f64,
    pub shipping_amount: f64,
    pub total: f64,
    pub opportunity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteItem {
    pub source_id: Option<SourceId>,
    pub quote: Option<Ref<Quote>>,
    pub product: Option<Ref<Product>>,
    pub product_units: i32,
    pub product_price: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerEmployee {
    pub source_id: Option<SourceId>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub prefix: PersonPrefix,
    pub position: String,
    pub email: String,
    pub mobile_phone: String,
    pub is_purchase_authority: bool,
    pub picture: Option<Ref<Picture>>,
    pub customer: Option<Ref<Customer>>,
    pub customer_store: Option<Ref<CustomerStore>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerCommunication {
    pub source_id: Option<SourceId>,
    pub employee: Option<Ref<Employee>>,
    pub customer_employee: Option<Ref<CustomerEmployee>>,
    pub date: NaiveDateTime,
    pub purpose: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeTask {
    pub source_id: Option<SourceId>,
    pub subject: String,
    pub description: String,
    pub rtf_text_description: String,
    pub category: String,
    pub completion: i32,
    pub status: EmployeeTaskStatus,
    pub priority: EmployeeTaskPriority,
    pub follow_up: EmployeeTaskFollowUp,
    pub private: bool,
    pub reminder: bool,
    pub reminder_date_time: Option<NaiveDateTime>,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub predecessors: String,
    /// Legacy parent task key, copied verbatim and never resolved
    pub parent_id: Option<i64>,
    pub attached_collections_changed: bool,
    pub owner: Option<Ref<Employee>>,
    pub assigned_employee: Option<Ref<Employee>>,
    pub customer_employee: Option<Ref<CustomerEmployee>>,
    pub assigned_employees: Vec<Ref<Employee>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskAttachedFile {
    pub source_id: Option<SourceId>,
    pub employee_task: Option<Ref<EmployeeTask>>,
    pub file: Option<Ref<FileData>>,
}

/// File payload owned by a [`TaskAttachedFile`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileData {
    /// Always `None`; file payloads have no legacy key of their own
    pub source_id: Option<SourceId>,
    pub file_name: String,
    pub content: Vec<u8>,
}

macro_rules! entities {
    ($($ty:ident { $($field:ident),* } $(many { $($list:ident),* })?),+ $(,)?) => {
        /// Any target entity, tagged with its kind
        #[derive(Debug, Clone, PartialEq)]
        pub enum AnyEntity {
            $(
                #[allow(missing_docs)]
                $ty($ty),
            )+
        }

        impl AnyEntity {
            /// Kind tag
            #[must_use]
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(AnyEntity::$ty(_) => EntityKind::$ty,)+
                }
            }

            /// Mirrored legacy key
            #[must_use]
            pub fn source_id(&self) -> Option<SourceId> {
                match self {
                    $(AnyEntity::$ty(e) => e.source_id(),)+
                }
            }

            /// Outgoing references
            #[must_use]
            pub fn references(&self) -> Vec<AnyRef> {
                match self {
                    $(AnyEntity::$ty(e) => e.references(),)+
                }
            }
        }

        $(
            impl Entity for $ty {
                const KIND: EntityKind = EntityKind::$ty;

                fn source_id(&self) -> Option<SourceId> {
                    self.source_id
                }

                #[allow(unused_mut)]
                fn references(&self) -> Vec<AnyRef> {
                    let mut refs = Vec::new();
                    $(
                        if let Some(r) = self.$field {
                            refs.push(r.erase());
                        }
                    )*
                    $($(
                        refs.extend(self.$list.iter().map(|r| r.erase()));
                    )*)?
                    refs
                }

                fn into_any(self) -> AnyEntity {
                    AnyEntity::$ty(self)
                }

                fn from_any(any: AnyEntity) -> Option<Self> {
                    match any {
                        AnyEntity::$ty(e) => Some(e),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

entities! {
    Crest {},
    State {},
    Customer {},
    Picture {},
    Probation {},
    CustomerStore { customer, crest },
    Employee { picture, probation_reason },
    Evaluation { employee, manager },
    Product { engineer, support, primary_image },
    ProductImage { product, picture },
    ProductCatalog { product },
    Order { customer, store, employee },
    OrderItem { order, product },
    Quote { customer, customer_store, employee },
    QuoteItem { quote, product },
    CustomerEmployee { picture, customer, customer_store },
    CustomerCommunication { employee, customer_employee },
    EmployeeTask { owner, assigned_employee, customer_employee } many { assigned_employees },
    TaskAttachedFile { employee_task, file },
    FileData {},
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntityId;

    #[test]
    fn references_cover_single_and_many_fields() {
        let task = EmployeeTask {
            owner: Some(Ref::new(EntityId(1))),
            assigned_employees: vec![Ref::new(EntityId(2)), Ref::new(EntityId(3))],
            ..EmployeeTask::default()
        };
        let refs = task.references();
        assert_eq!(refs.len(), 3);
        assert!(refs.iter().all(|r| r.kind == EntityKind::Employee));
    }

    #[test]
    fn any_entity_round_trip() {
        let order = Order {
            source_id: Some(SourceId(5)),
            invoice_number: "INV-1".into(),
            ..Order::default()
        };
        let any = order.clone().into_any();
        assert_eq!(any.kind(), EntityKind::Order);
        assert_eq!(any.source_id(), Some(SourceId(5)));
        assert_eq!(Order::from_any(any.clone()), Some(order));
        assert_eq!(Quote::from_any(any), None);
    }

    #[test]
    fn empty_references_for_leaf_kinds() {
        assert!(Crest::default().references().is_empty());
    }
}
