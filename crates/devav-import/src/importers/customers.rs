//! Customers, their stores and their contacts

use super::{address, Transform, TransformContext};
use crate::error::MigrationError;
use devav_model::source::{
    CustomerCommunicationRow, CustomerEmployeeRow, CustomerRow, CustomerStoreRow,
};
use devav_model::target::{Customer, CustomerCommunication, CustomerEmployee, CustomerStore};
use devav_model::{CustomerStatus, EntityKind, PersonPrefix};

pub struct CustomerImport;

impl Transform for CustomerImport {
    type Row = CustomerRow;
    type Target = Customer;
    const DEPENDS_ON: &'static [EntityKind] = &[];

    fn transform(row: CustomerRow, _cx: &TransformContext<'_>) -> Result<Customer, MigrationError> {
        Ok(Customer {
            source_id: Some(row.id),
            status: CustomerStatus::from_literal(row.status)?,
            billing_address: address(row.billing_address)?,
            home_office: address(row.home_office)?,
            name: row.name,
            phone: row.phone,
            fax: row.fax,
            website: row.website,
            annual_revenue: row.annual_revenue,
            total_employees: row.total_employees,
            total_stores: row.total_stores,
            profile: row.profile,
            logo: row.logo,
        })
    }
}

pub struct CustomerStoreImport;

impl Transform for CustomerStoreImport {
    type Row = CustomerStoreRow;
    type Target = CustomerStore;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::Customer, EntityKind::Crest];
    const INCLUDES: &'static [&'static str] = &["Customer", "Crest"];

    fn transform(
        row: CustomerStoreRow,
        cx: &TransformContext<'_>,
    ) -> Result<CustomerStore, MigrationError> {
        const KIND: EntityKind = EntityKind::CustomerStore;
        Ok(CustomerStore {
            source_id: Some(row.id),
            customer: Some(cx.require(KIND, "Customer", row.customer)?),
            crest: cx.resolve(row.crest)?,
            address: address(row.address)?,
            phone: row.phone,
            fax: row.fax,
            location: row.location,
            annual_sales: row.annual_sales,
            square_footage: row.square_footage,
            total_employees: row.total_employees,
        })
    }
}

pub struct CustomerEmployeeImport;

impl Transform for CustomerEmployeeImport {
    type Row = CustomerEmployeeRow;
    type Target = CustomerEmployee;
    const DEPENDS_ON: &'static [EntityKind] = &[
        EntityKind::Picture,
        EntityKind::Customer,
        EntityKind::CustomerStore,
    ];
    const INCLUDES: &'static [&'static str] = &["Picture", "Customer", "CustomerStore"];

    fn transform(
        row: CustomerEmployeeRow,
        cx: &TransformContext<'_>,
    ) -> Result<CustomerEmployee, MigrationError> {
        const KIND: EntityKind = EntityKind::CustomerEmployee;
        Ok(CustomerEmployee {
            source_id: Some(row.id),
            prefix: PersonPrefix::from_literal(row.prefix)?,
            picture: Some(cx.require(KIND, "Picture", row.picture)?),
            customer: Some(cx.require(KIND, "Customer", row.customer)?),
            customer_store: Some(cx.require(KIND, "CustomerStore", row.customer_store)?),
            first_name: row.first_name,
            last_name: row.last_name,
            full_name: row.full_name,
            position: row.position,
            email: row.email,
            mobile_phone: row.mobile_phone,
            is_purchase_authority: row.is_purchase_authority,
        })
    }
}

pub struct CustomerCommunicationImport;

impl Transform for CustomerCommunicationImport {
    type Row = CustomerCommunicationRow;
    type Target = CustomerCommunication;
    const DEPENDS_ON: &'static [EntityKind] =
        &[EntityKind::Employee, EntityKind::CustomerEmployee];
    const INCLUDES: &'static [&'static str] = &["Employee", "CustomerEmployee"];

    fn transform(
        row: CustomerCommunicationRow,
        cx: &TransformContext<'_>,
    ) -> Result<CustomerCommunication, MigrationError> {
        const KIND: EntityKind = EntityKind::CustomerCommunication;
        Ok(CustomerCommunication {
            source_id: Some(row.id),
            employee: Some(cx.require(KIND, "Employee", row.employee)?),
            customer_employee: Some(cx.require(KIND, "CustomerEmployee", row.customer_employee)?),
            date: row.date,
            purpose: row.purpose,
            kind: row.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::SourceIndex;
    use devav_model::source::SourceAddress;
    use devav_model::{EntityId, SourceId, StateCode, TransformError};
    use devav_store::MemoryTargetStore;

    fn ca() -> SourceAddress {
        SourceAddress {
            state: "CA".into(),
            ..SourceAddress::default()
        }
    }

    #[test]
    fn customer_status_and_addresses_are_mapped() {
        let index = SourceIndex::new();
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);
        let customer = CustomerImport::transform(
            CustomerRow {
                id: SourceId(1),
                name: "Acme".into(),
                status: 1,
                billing_address: ca(),
                home_office: ca(),
                ..CustomerRow::default()
            },
            &cx,
        )
        .unwrap();
        assert_eq!(customer.status, CustomerStatus::Suspended);
        assert_eq!(customer.home_office.state, StateCode::CA);
    }

    #[test]
    fn unmapped_status_is_a_transform_error() {
        let index = SourceIndex::new();
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);
        let err = CustomerImport::transform(
            CustomerRow {
                status: 7,
                billing_address: ca(),
                home_office: ca(),
                ..CustomerRow::default()
            },
            &cx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MigrationError::Transform(TransformError::UnmappedLiteral { value: 7, .. })
        ));
    }

    #[test]
    fn store_crest_is_optional() {
        let index = SourceIndex::new();
        index
            .register(EntityKind::Customer, SourceId(1), EntityId(5))
            .unwrap();
        index.seal();
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);

        let customer_store = CustomerStoreImport::transform(
            CustomerStoreRow {
                id: SourceId(2),
                customer: Some(SourceId(1)),
                address: ca(),
                ..CustomerStoreRow::default()
            },
            &cx,
        )
        .unwrap();
        assert_eq!(customer_store.customer.map(|r| r.id()), Some(EntityId(5)));
        assert_eq!(customer_store.crest, None);
    }
}
