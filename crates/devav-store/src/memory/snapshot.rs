//! JSON snapshot of a legacy dataset

use crate::error::StoreError;
use devav_model::source::{
    CrestRow, CustomerCommunicationRow, CustomerEmployeeRow, CustomerRow, CustomerStoreRow,
    EmployeeRow, EmployeeTaskRow, EvaluationRow, OrderItemRow, OrderRow, PictureRow,
    ProbationRow, ProductCatalogRow, ProductImageRow, ProductRow, QuoteItemRow, QuoteRow,
    StateRow, TaskAttachedFileRow,
};
use devav_model::{EntityKind, SourceRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

macro_rules! snapshot {
    ($($field:ident: $kind:ident($row:ty)),+ $(,)?) => {
        /// Every legacy collection, one vector per kind
        ///
        /// Missing collections deserialize as empty.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct SourceSnapshot {
            $(pub $field: Vec<$row>,)+
        }

        impl SourceSnapshot {
            /// Records of one collection, in snapshot order
            #[must_use]
            pub fn records_of(&self, kind: EntityKind) -> Vec<SourceRecord> {
                match kind {
                    $(EntityKind::$kind => self
                        .$field
                        .iter()
                        .cloned()
                        .map(SourceRecord::$kind)
                        .collect(),)+
                    EntityKind::FileData => Vec::new(),
                }
            }

            /// Append a record to its collection
            pub fn push(&mut self, record: SourceRecord) {
                match record {
                    $(SourceRecord::$kind(row) => self.$field.push(row),)+
                }
            }

            /// Total number of records across all collections
            #[must_use]
            pub fn len(&self) -> usize {
                0 $(+ self.$field.len())+
            }
        }
    };
}

snapshot! {
    crests: Crest(CrestRow),
    states: State(StateRow),
    customers: Customer(CustomerRow),
    pictures: Picture(PictureRow),
    probations: Probation(ProbationRow),
    customer_stores: CustomerStore(CustomerStoreRow),
    employees: Employee(EmployeeRow),
    evaluations: Evaluation(EvaluationRow),
    products: Product(ProductRow),
    product_images: ProductImage(ProductImageRow),
    product_catalogs: ProductCatalog(ProductCatalogRow),
    orders: Order(OrderRow),
    order_items: OrderItem(OrderItemRow),
    quotes: Quote(QuoteRow),
    quote_items: QuoteItem(QuoteItemRow),
    customer_employees: CustomerEmployee(CustomerEmployeeRow),
    customer_communications: CustomerCommunication(CustomerCommunicationRow),
    employee_tasks: EmployeeTask(EmployeeTaskRow),
    task_attached_files: TaskAttachedFile(TaskAttachedFileRow),
}

impl SourceSnapshot {
    /// Whether every collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode a snapshot from JSON text
    ///
    /// # Errors
    /// [`StoreError::Snapshot`] on malformed input
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a snapshot file
    ///
    /// # Errors
    /// [`StoreError::Io`] when the file cannot be read, [`StoreError::Snapshot`]
    /// when it cannot be decoded
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl FromIterator<SourceRecord> for SourceSnapshot {
    fn from_iter<I: IntoIterator<Item = SourceRecord>>(iter: I) -> Self {
        let mut snapshot = Self::default();
        for record in iter {
            snapshot.push(record);
        }
        snapshot
    }
}
