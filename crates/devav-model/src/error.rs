//! Transform errors
//!
//! Raised when a source value has no representation on the target side.

use crate::kind::EntityKind;

/// A source field could not be coerced into its target representation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// Numeric literal without an entry in the field's mapping table
    #[error("{field}: literal {value} has no target value")]
    UnmappedLiteral {
        /// Target field being populated
        field: &'static str,
        /// Offending source literal
        value: i64,
    },

    /// State short name not present in the state table
    #[error("unknown state short name {0:?}")]
    UnknownState(String),

    /// Required reference absent in the source row
    #[error("{kind}.{field} is required but the source row has no reference")]
    MissingReference {
        /// Kind being imported
        kind: EntityKind,
        /// Reference field
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = TransformError::UnmappedLiteral {
            field: "Order.ShipmentStatus",
            value: 9,
        };
        assert!(err.to_string().contains("Order.ShipmentStatus"));

        let err = TransformError::MissingReference {
            kind: EntityKind::Order,
            field: "Customer",
        };
        assert_eq!(
            err.to_string(),
            "Order.Customer is required but the source row has no reference"
        );
    }
}
