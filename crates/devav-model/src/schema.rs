//! Field descriptor tables
//!
//! Types that can be duplicated by the aggregate cloner publish an explicit
//! table of their persisted fields. Each entry names the field, tags its
//! role and carries a copier; nothing is discovered at runtime.

use crate::kind::EntityKind;
use crate::target::{Entity, Order, OrderItem, Quote, QuoteItem};
use serde::{Deserialize, Serialize};

/// Role a persisted field plays in its entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldRole {
    /// Mirrored legacy key
    SourceKey,
    /// Plain value
    Scalar,
    /// Association with another entity
    Reference,
    /// Ownership link to the aggregate parent
    Parent,
    /// Rewritten by the cloner, never copied
    Overridden,
}

impl FieldRole {
    /// Whether fields with this role belong to a clone descriptor
    #[inline]
    #[must_use]
    pub const fn is_clonable(self) -> bool {
        matches!(self, FieldRole::Scalar | FieldRole::Reference | FieldRole::Parent)
    }
}

/// Schema metadata for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldInfo {
    /// Field name as declared on the entity
    pub name: &'static str,
    /// Role of the field
    pub role: FieldRole,
}

/// Field metadata plus a copier from one instance to another
pub struct FieldDescriptor<T> {
    /// Schema metadata
    pub info: FieldInfo,
    /// Copies the field value from `src` into `dst`
    pub copy: fn(&mut T, &T),
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldDescriptor<T> {}

impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// An entity with a published field table
pub trait Clonable: Entity {
    /// Every persisted field of the entity
    fn fields() -> &'static [FieldDescriptor<Self>];
}

macro_rules! field {
    ($ty:ty, $name:ident, $role:ident) => {
        FieldDescriptor {
            info: FieldInfo {
                name: stringify!($name),
                role: FieldRole::$role,
            },
            copy: |dst: &mut $ty, src: &$ty| dst.$name = src.$name.clone(),
        }
    };
}

macro_rules! clonable {
    ($ty:ident { $($name:ident: $role:ident),+ $(,)? }) => {
        impl Clonable for $ty {
            fn fields() -> &'static [FieldDescriptor<Self>] {
                static FIELDS: &[FieldDescriptor<$ty>] = &[$(field!($ty, $name, $role)),+];
                FIELDS
            }
        }
    };
}

clonable!(Order {
    source_id: SourceKey,
    invoice_number: Overridden,
    order_date: Overridden,
    ship_date: Scalar,
    customer: Reference,
    store: Reference,
    employee: Reference,
    po_number: Scalar,
    order_terms: Scalar,
    comments: Scalar,
    sale_amount: Scalar,
    shipping_amount: Scalar,
    total_amount: Scalar,
    payment_total: Scalar,
    refund_total: Scalar,
    shipment_courier: Scalar,
    shipment_status: Scalar,
});

clonable!(OrderItem {
    source_id: SourceKey,
    order: Parent,
    product: Reference,
    product_units: Scalar,
    product_price: Scalar,
    discount: Scalar,
    total: Scalar,
});

clonable!(Quote {
    source_id: SourceKey,
    number: Overridden,
    date: Overridden,
    customer: Reference,
    customer_store: Reference,
    employee: Reference,
    sub_total: Scalar,
    shipping_amount: Scalar,
    total: Scalar,
    opportunity: Scalar,
});

clonable!(QuoteItem {
    source_id: SourceKey,
    quote: Parent,
    product: Reference,
    product_units: Scalar,
    product_price: Scalar,
    discount: Scalar,
    total: Scalar,
});

fn clonable_infos<T: Clonable>() -> Vec<FieldInfo> {
    T::fields()
        .iter()
        .map(|d| d.info)
        .filter(|info| info.role.is_clonable())
        .collect()
}

/// Clone descriptor of `kind`, or `None` when the kind publishes no table
#[must_use]
pub fn clonable_fields_of(kind: EntityKind) -> Option<Vec<FieldInfo>> {
    match kind {
        EntityKind::Order => Some(clonable_infos::<Order>()),
        EntityKind::OrderItem => Some(clonable_infos::<OrderItem>()),
        EntityKind::Quote => Some(clonable_infos::<Quote>()),
        EntityKind::QuoteItem => Some(clonable_infos::<QuoteItem>()),
        _ => None,
    }
}
