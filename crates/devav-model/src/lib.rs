//! DevAV Model - both sides of the migration
//!
//! Types shared by every stage of the DevAV import:
//! - Legacy source rows, keyed by [`SourceId`]
//! - Target entities, referencing each other through typed [`Ref`]s
//! - Explicit literal tables for every enumerated field
//! - Field descriptor tables for the types the cloner duplicates
//!
//! # Example
//!
//! ```rust
//! use devav_model::{EntityKind, ShipmentStatus, StateCode};
//!
//! assert_eq!(ShipmentStatus::from_literal(1).unwrap(), ShipmentStatus::Transit);
//! assert_eq!(StateCode::from_short_name("CA").unwrap().ordinal(), 0);
//! assert!(!EntityKind::FileData.is_imported());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod enums;
pub mod error;
pub mod ids;
pub mod kind;
pub mod schema;
pub mod source;
pub mod target;

pub use enums::{
    Bonus, CustomerStatus, EmployeeDepartment, EmployeeStatus, EmployeeTaskFollowUp,
    EmployeeTaskPriority, EmployeeTaskStatus, EvaluationRating, PersonPrefix, ProductCategory,
    Raise, ShipmentCourier, ShipmentStatus, StateCode,
};
pub use error::TransformError;
pub use ids::{AnyRef, EntityId, Ref, SourceId};
pub use kind::EntityKind;
pub use schema::{clonable_fields_of, Clonable, FieldDescriptor, FieldInfo, FieldRole};
pub use source::{SourceAddress, SourceRecord, SourceRow};
pub use target::{AnyEntity, Entity};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the DevAV model
    pub use crate::{
        AnyEntity, AnyRef, Entity, EntityId, EntityKind, Ref, SourceId, SourceRecord, SourceRow,
        TransformError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
