//! Rows of the legacy source store
//!
//! Rows are immutable snapshots. References to other rows are carried as
//! the referenced row's [`SourceId`]; `None` means the legacy row had no
//! related record loaded for that navigation.

use crate::ids::SourceId;
use crate::kind::EntityKind;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Postal address as stored on legacy rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceAddress {
    pub line: String,
    pub city: String,
    /// Two-letter state short name
    pub state: String,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrestRow {
    pub id: SourceId,
    pub city_name: String,
    pub large_image: Vec<u8>,
    pub small_image: Vec<u8>,
}

/// Legacy state row, keyed by its short name only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateRow {
    pub short_name: String,
    pub long_name: String,
    pub flag_48px: Vec<u8>,
    pub flag_24px: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerRow {
    pub id: SourceId,
    pub name: String,
    pub phone: String,
    pub fax: String,
    pub website: String,
    pub status: i64,
    pub annual_revenue: f64,
    pub total_employees: i32,
    pub total_stores: i32,
    pub profile: String,
    pub logo: Vec<u8>,
    pub billing_address: SourceAddress,
    pub home_office: SourceAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictureRow {
    pub id: SourceId,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbationRow {
    pub id: SourceId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerStoreRow {
    pub id: SourceId,
    pub customer: Option<SourceId>,
    pub crest: Option<SourceId>,
    pub phone: String,
    pub fax: String,
    pub location: String,
    pub address: SourceAddress,
    pub annual_sales: f64,
    pub square_footage: i32,
    pub total_employees: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeRow {
    pub id: SourceId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub prefix: i64,
    pub title: String,
    pub department: i64,
    pub status: i64,
    pub email: String,
    pub skype: String,
    pub home_phone: String,
    pub mobile_phone: String,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub personal_profile: String,
    pub address: SourceAddress,
    pub picture: Option<SourceId>,
    pub probation_reason: Option<SourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationRow {
    pub id: SourceId,
    pub employee: Option<SourceId>,
    pub created_by: Option<SourceId>,
    pub created_on: NaiveDateTime,
    pub subject: String,
    pub details: String,
    pub rating: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRow {
    pub id: SourceId,
    pub name: String,
    pub description: String,
    pub category: i64,
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
    pub engineer: Option<SourceId>,
    pub support: Option<SourceId>,
    pub primary_image: Option<SourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductImageRow {
    pub id: SourceId,
    pub product: Option<SourceId>,
    pub picture: Option<SourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductCatalogRow {
    pub id: SourceId,
    pub product: Option<SourceId>,
    pub pdf: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderRow {
    pub id: SourceId,
    pub invoice_number: String,
    pub order_date: NaiveDateTime,
    pub ship_date: Option<NaiveDateTime>,
    pub customer: Option<SourceId>,
    pub store: Option<SourceId>,
    pub employee: Option<SourceId>,
    pub po_number: String,
    pub order_terms: String,
    pub comments: String,
    pub sale_amount: f64,
    pub shipping_amount: f64,
    pub total_amount: f64,
    pub payment_total: f64,
    pub refund_total: f64,
    pub shipment_courier: i64,
    pub shipment_status: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItemRow {
    pub id: SourceId,
    pub order: Option<SourceId>,
    pub product: Option<SourceId>,
    pub product_units: i32,
    pub product_price: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteRow {
    pub id: SourceId,
    pub number: String,
    pub date: NaiveDateTime,
    pub customer: Option<SourceId>,
    pub customer_store: Option<SourceId>,
    pub employee: Option<SourceId>,
    pub sub_total: f64,
    pub shipping_amount: f64,
    pub total: f64,
    pub opportunity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteItemRow {
    pub id: SourceId,
    pub quote: Option<SourceId>,
    pub product: Option<SourceId>,
    pub product_units: i32,
    pub product_price: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerEmployeeRow {
    pub id: SourceId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub prefix: i64,
    pub position: String,
    pub email: String,
    pub mobile_phone: String,
    pub is_purchase_authority: bool,
    pub picture: Option<SourceId>,
    pub customer: Option<SourceId>,
    pub customer_store: Option<SourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerCommunicationRow {
    pub id: SourceId,
    pub employee: Option<SourceId>,
    pub customer_employee: Option<SourceId>,
    pub date: NaiveDateTime,
    pub purpose: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeTaskRow {
    pub id: SourceId,
    pub subject: String,
    pub description: String,
    pub rtf_text_description: String,
    pub category: String,
    pub completion: i32,
    pub status: i64,
    pub priority: i64,
    pub follow_up: i64,
    pub private: bool,
    pub reminder: bool,
    pub reminder_date_time: Option<NaiveDateTime>,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub predecessors: String,
    pub parent_id: Option<i64>,
    pub attached_collections_changed: bool,
    pub owner: Option<SourceId>,
    pub assigned_employee: Option<SourceId>,
    pub customer_employee: Option<SourceId>,
    pub assigned_employees: Vec<SourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskAttachedFileRow {
    pub id: SourceId,
    pub name: String,
    pub content: Vec<u8>,
    pub employee_task: Option<SourceId>,
}

/// A legacy row type bound to its entity kind
pub trait SourceRow: Sized + Send + 'static {
    /// Kind of the collection this row comes from
    const KIND: EntityKind;

    /// Unwrap the matching record variant, handing back anything else
    ///
    /// # Errors
    /// Returns the record unchanged when it belongs to another kind
    fn from_record(record: SourceRecord) -> Result<Self, SourceRecord>;

    /// Wrap into the kind-erased record
    fn into_record(self) -> SourceRecord;
}

macro_rules! source_records {
    ($($kind:ident($row:ident)),+ $(,)?) => {
        /// Any legacy row, tagged with its kind
        #[derive(Debug, Clone, PartialEq)]
        pub enum SourceRecord {
            $(
                #[allow(missing_docs)]
                $kind($row),
            )+
        }

        impl SourceRecord {
            /// Kind of the collection the row belongs to
            #[must_use]
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(SourceRecord::$kind(_) => EntityKind::$kind,)+
                }
            }
        }

        $(
            impl SourceRow for $row {
                const KIND: EntityKind = EntityKind::$kind;

                fn from_record(record: SourceRecord) -> Result<Self, SourceRecord> {
                    match record {
                        SourceRecord::$kind(row) => Ok(row),
                        other => Err(other),
                    }
                }

                fn into_record(self) -> SourceRecord {
                    SourceRecord::$kind(self)
                }
            }
        )+
    };
}

source_records! {
    Crest(CrestRow),
    State(StateRow),
    Customer(CustomerRow),
    Picture(PictureRow),
    Probation(ProbationRow),
    CustomerStore(CustomerStoreRow),
    Employee(EmployeeRow),
    Evaluation(EvaluationRow),
    Product(ProductRow),
    ProductImage(ProductImageRow),
    ProductCatalog(ProductCatalogRow),
    Order(OrderRow),
    OrderItem(OrderItemRow),
    Quote(QuoteRow),
    QuoteItem(QuoteItemRow),
    CustomerEmployee(CustomerEmployeeRow),
    CustomerCommunication(CustomerCommunicationRow),
    EmployeeTask(EmployeeTaskRow),
    TaskAttachedFile(TaskAttachedFileRow),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_round_trips_through_row() {
        let row = ProbationRow {
            id: SourceId(4),
            reason: "late".into(),
        };
        let record = row.clone().into_record();
        assert_eq!(record.kind(), EntityKind::Probation);
        assert_eq!(ProbationRow::from_record(record).unwrap(), row);
    }

    #[test]
    fn wrong_kind_is_handed_back() {
        let record = PictureRow::default().into_record();
        let back = CrestRow::from_record(record).unwrap_err();
        assert_eq!(back.kind(), EntityKind::Picture);
    }

    #[test]
    fn rows_tolerate_missing_fields_in_json() {
        let row: EmployeeRow =
            serde_json::from_str(r#"{"id": 9, "first_name": "Jane"}"#).unwrap();
        assert_eq!(row.id, SourceId(9));
        assert_eq!(row.first_name, "Jane");
        assert_eq!(row.probation_reason, None);
    }
}
