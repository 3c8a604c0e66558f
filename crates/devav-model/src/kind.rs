//! Entity kinds known to the migration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every entity kind that exists in the target store
///
/// All kinds except [`EntityKind::FileData`] are imported from a source
/// collection of the same name. `FileData` is owned by `TaskAttachedFile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Crest,
    State,
    Customer,
    Picture,
    Probation,
    CustomerStore,
    Employee,
    Evaluation,
    Product,
    ProductImage,
    ProductCatalog,
    Order,
    OrderItem,
    Quote,
    QuoteItem,
    CustomerEmployee,
    CustomerCommunication,
    EmployeeTask,
    TaskAttachedFile,
    FileData,
}

impl EntityKind {
    /// All kinds, in declaration order
    pub const ALL: [EntityKind; 20] = [
        EntityKind::Crest,
        EntityKind::State,
        EntityKind::Customer,
        EntityKind::Picture,
        EntityKind::Probation,
        EntityKind::CustomerStore,
        EntityKind::Employee,
        EntityKind::Evaluation,
        EntityKind::Product,
        EntityKind::ProductImage,
        EntityKind::ProductCatalog,
        EntityKind::Order,
        EntityKind::OrderItem,
        EntityKind::Quote,
        EntityKind::QuoteItem,
        EntityKind::CustomerEmployee,
        EntityKind::CustomerCommunication,
        EntityKind::EmployeeTask,
        EntityKind::TaskAttachedFile,
        EntityKind::FileData,
    ];

    /// Stable display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Crest => "Crest",
            EntityKind::State => "State",
            EntityKind::Customer => "Customer",
            EntityKind::Picture => "Picture",
            EntityKind::Probation => "Probation",
            EntityKind::CustomerStore => "CustomerStore",
            EntityKind::Employee => "Employee",
            EntityKind::Evaluation => "Evaluation",
            EntityKind::Product => "Product",
            EntityKind::ProductImage => "ProductImage",
            EntityKind::ProductCatalog => "ProductCatalog",
            EntityKind::Order => "Order",
            EntityKind::OrderItem => "OrderItem",
            EntityKind::Quote => "Quote",
            EntityKind::QuoteItem => "QuoteItem",
            EntityKind::CustomerEmployee => "CustomerEmployee",
            EntityKind::CustomerCommunication => "CustomerCommunication",
            EntityKind::EmployeeTask => "EmployeeTask",
            EntityKind::TaskAttachedFile => "TaskAttachedFile",
            EntityKind::FileData => "FileData",
        }
    }

    /// Whether rows of this kind are read from the source store
    #[inline]
    #[must_use]
    pub const fn is_imported(self) -> bool {
        !matches!(self, EntityKind::FileData)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
