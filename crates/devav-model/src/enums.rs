//! Enumerated target fields and their mapping tables
//!
//! Source rows carry enumerated values as numeric literals (and states as
//! short names). Every enum here owns an explicit table from literal to
//! variant; anything outside the table is a [`TransformError`].

use crate::error::TransformError;
use serde::{Deserialize, Serialize};

/// Declares an enum together with its literal table
macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $field:literal {
            $($variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::TABLE[0].1
            }
        }

        impl $name {
            /// Literal table, source code to variant
            pub const TABLE: &'static [(i64, $name)] = &[$(($code, $name::$variant)),+];

            /// Map a source literal through the table
            ///
            /// # Errors
            /// [`TransformError::UnmappedLiteral`] for literals outside the table
            pub fn from_literal(value: i64) -> Result<Self, TransformError> {
                Self::TABLE
                    .iter()
                    .find(|(code, _)| *code == value)
                    .map(|(_, variant)| *variant)
                    .ok_or(TransformError::UnmappedLiteral { field: $field, value })
            }

            /// Source literal for this variant
            #[must_use]
            pub fn literal(self) -> i64 {
                match self {
                    $($name::$variant => $code,)+
                }
            }
        }
    };
}

literal_enum! {
    /// Account status of a customer
    CustomerStatus as "Customer.Status" {
        Active = 0,
        Suspended = 1,
    }
}

literal_enum! {
    /// Honorific prefix shared by employees and customer contacts
    PersonPrefix as "Prefix" {
        None = 0,
        Dr = 1,
        Mr = 2,
        Ms = 3,
        Miss = 4,
        Mrs = 5,
    }
}

literal_enum! {
    EmployeeDepartment as "Employee.Department" {
        Sales = 1,
        Support = 2,
        Shipping = 3,
        Engineering = 4,
        HumanResources = 5,
        Management = 6,
        IT = 7,
    }
}

literal_enum! {
    EmployeeStatus as "Employee.Status" {
        Salaried = 0,
        Commission = 1,
        Contract = 2,
        Terminated = 3,
        OnLeave = 4,
    }
}

literal_enum! {
    EvaluationRating as "Evaluation.Rating" {
        Unset = 0,
        Good = 1,
        Average = 2,
        Poor = 3,
    }
}

literal_enum! {
    ProductCategory as "Product.Category" {
        Automation = 1,
        Monitors = 2,
        Projectors = 3,
        Televisions = 4,
        VideoPlayers = 5,
    }
}

literal_enum! {
    ShipmentCourier as "Order.ShipmentCourier" {
        None = 0,
        FedEx = 1,
        Ups = 2,
        Dhl = 3,
    }
}

literal_enum! {
    ShipmentStatus as "Order.ShipmentStatus" {
        Awaiting = 0,
        Transit = 1,
        Received = 2,
    }
}

literal_enum! {
    EmployeeTaskStatus as "EmployeeTask.Status" {
        NotStarted = 0,
        Completed = 1,
        InProgress = 2,
        NeedAssistance = 3,
        Deferred = 4,
    }
}

literal_enum! {
    EmployeeTaskPriority as "EmployeeTask.Priority" {
        Low = 0,
        Normal = 1,
        High = 2,
        Urgent = 3,
    }
}

literal_enum! {
    EmployeeTaskFollowUp as "EmployeeTask.FollowUp" {
        Never = 0,
        Tomorrow = 1,
        InThreeDays = 2,
        NextWeek = 3,
    }
}

/// Evaluation outcome flag, derived from the evaluation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Raise {
    #[default]
    No,
    Yes,
}

/// Evaluation outcome flag, derived from the evaluation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Bonus {
    #[default]
    No,
    Yes,
}

/// US state codes in legacy enumeration order
///
/// The legacy `State` rows have no surrogate key of their own; their
/// SourceId is the position of the short name in this order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[allow(missing_docs)]
pub enum StateCode {
    #[default]
    CA, AR, AL, AK, AZ, CO, CT, DE, DC, FL, GA, HI, ID, IL, IN, IA, KS, KY, LA, ME, MD, MA,
    MI, MN, MS, MO, MT, NE, NV, NH, NJ, NM, NY, NC, OH, OK, OR, PA, RI, SC, SD, TN, TX, UT,
    VT, VA, WA, WV, WI, WY, ND,
}

impl StateCode {
    /// All codes in legacy enumeration order
    pub const ALL: [StateCode; 51] = {
        use StateCode::*;
        [
            CA, AR, AL, AK, AZ, CO, CT, DE, DC, FL, GA, HI, ID, IL, IN, IA, KS, KY, LA, ME, MD,
            MA, MI, MN, MS, MO, MT, NE, NV, NH, NJ, NM, NY, NC, OH, OK, OR, PA, RI, SC, SD, TN,
            TX, UT, VT, VA, WA, WV, WI, WY, ND,
        ]
    };

    /// Two-letter short name
    #[must_use]
    pub fn short_name(self) -> &'static str {
        const NAMES: [&str; 51] = [
            "CA", "AR", "AL", "AK", "AZ", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL",
            "IN", "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE",
            "NV", "NH", "NJ", "NM", "NY", "NC", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN",
            "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY", "ND",
        ];
        NAMES[self.ordinal()]
    }

    /// Position in the legacy enumeration
    #[must_use]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Parse a short name by exact match
    ///
    /// # Errors
    /// [`TransformError::UnknownState`] when nothing matches
    pub fn from_short_name(name: &str) -> Result<Self, TransformError> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.short_name() == name)
            .ok_or_else(|| TransformError::UnknownState(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn literal_tables_round_trip_every_variant() {
        for (code, variant) in ShipmentStatus::TABLE {
            assert_eq!(ShipmentStatus::from_literal(*code).unwrap(), *variant);
            assert_eq!(variant.literal(), *code);
        }
        assert_eq!(
            EmployeeDepartment::from_literal(4).unwrap(),
            EmployeeDepartment::Engineering
        );
    }

    #[test]
    fn department_has_no_zero() {
        assert_eq!(
            EmployeeDepartment::from_literal(0),
            Err(TransformError::UnmappedLiteral {
                field: "Employee.Department",
                value: 0
            })
        );
    }

    #[test]
    fn state_ordinals_follow_legacy_order() {
        assert_eq!(StateCode::CA.ordinal(), 0);
        assert_eq!(StateCode::ND.ordinal(), 50);
        for (i, code) in StateCode::ALL.iter().enumerate() {
            assert_eq!(code.ordinal(), i);
        }
    }

    #[test]
    fn state_parse_is_exact() {
        assert_eq!(StateCode::from_short_name("NY").unwrap(), StateCode::NY);
        assert!(StateCode::from_short_name("ny").is_err());
        assert!(StateCode::from_short_name(" NY").is_err());
    }

    proptest! {
        #[test]
        fn literals_outside_table_are_rejected(value in any::<i64>()) {
            let known = CustomerStatus::TABLE.iter().any(|(code, _)| *code == value);
            prop_assert_eq!(CustomerStatus::from_literal(value).is_ok(), known);
        }
    }
}
