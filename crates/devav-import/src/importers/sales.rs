//! Orders and quotes with their line items

use super::{Transform, TransformContext};
use crate::error::MigrationError;
use devav_model::source::{OrderItemRow, OrderRow, QuoteItemRow, QuoteRow};
use devav_model::target::{Order, OrderItem, Quote, QuoteItem};
use devav_model::{EntityKind, ShipmentCourier, ShipmentStatus};

pub struct OrderImport;

impl Transform for OrderImport {
    type Row = OrderRow;
    type Target = Order;
    const DEPENDS_ON: &'static [EntityKind] = &[
        EntityKind::Employee,
        EntityKind::Customer,
        EntityKind::CustomerStore,
    ];
    const INCLUDES: &'static [&'static str] = &["Employee", "Customer", "Store"];

    fn transform(row: OrderRow, cx: &TransformContext<'_>) -> Result<Order, MigrationError> {
        const KIND: EntityKind = EntityKind::Order;
        Ok(Order {
            source_id: Some(row.id),
            employee: Some(cx.require(KIND, "Employee", row.employee)?),
            customer: Some(cx.require(KIND, "Customer", row.customer)?),
            store: Some(cx.require(KIND, "Store", row.store)?),
            shipment_courier: ShipmentCourier::from_literal(row.shipment_courier)?,
            shipment_status: ShipmentStatus::from_literal(row.shipment_status)?,
            invoice_number: row.invoice_number,
            order_date: row.order_date,
            ship_date: row.ship_date,
            po_number: row.po_number,
            order_terms: row.order_terms,
            comments: row.comments,
            sale_amount: row.sale_amount,
            shipping_amount: row.shipping_amount,
            total_amount: row.total_amount,
            payment_total: row.payment_total,
            refund_total: row.refund_total,
        })
    }
}

pub struct OrderItemImport;

impl Transform for OrderItemImport {
    type Row = OrderItemRow;
    type Target = OrderItem;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::Order, EntityKind::Product];
    const INCLUDES: &'static [&'static str] = &["Order", "Product"];

    fn transform(row: OrderItemRow, cx: &TransformContext<'_>) -> Result<OrderItem, MigrationError> {
        const KIND: EntityKind = EntityKind::OrderItem;
        Ok(OrderItem {
            source_id: Some(row.id),
            order: Some(cx.require(KIND, "Order", row.order)?),
            product: Some(cx.require(KIND, "Product", row.product)?),
            product_units: row.product_units,
            product_price: row.product_price,
            discount: row.discount,
            total: row.total,
        })
    }
}

pub struct QuoteImport;

impl Transform for QuoteImport {
    type Row = QuoteRow;
    type Target = Quote;
    const DEPENDS_ON: &'static [EntityKind] = &[
        EntityKind::CustomerStore,
        EntityKind::Employee,
        EntityKind::Customer,
    ];
    const INCLUDES: &'static [&'static str] = &["CustomerStore", "Employee", "Customer"];

    fn transform(row: QuoteRow, cx: &TransformContext<'_>) -> Result<Quote, MigrationError> {
        const KIND: EntityKind = EntityKind::Quote;
        Ok(Quote {
            source_id: Some(row.id),
            customer_store: Some(cx.require(KIND, "CustomerStore", row.customer_store)?),
            employee: Some(cx.require(KIND, "Employee", row.employee)?),
            customer: Some(cx.require(KIND, "Customer", row.customer)?),
            number: row.number,
            date: row.date,
            sub_total: row.sub_total,
            shipping_amount: row.shipping_amount,
            total: row.total,
            opportunity: row.opportunity,
        })
    }
}

pub struct QuoteItemImport;

impl Transform for QuoteItemImport {
    type Row = QuoteItemRow;
    type Target = QuoteItem;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::Quote, EntityKind::Product];
    const INCLUDES: &'static [&'static str] = &["Quote", "Product"];

    fn transform(row: QuoteItemRow, cx: &TransformContext<'_>) -> Result<QuoteItem, MigrationError> {
        const KIND: EntityKind = EntityKind::QuoteItem;
        Ok(QuoteItem {
            source_id: Some(row.id),
            quote: Some(cx.require(KIND, "Quote", row.quote)?),
            product: Some(cx.require(KIND, "Product", row.product)?),
            product_units: row.product_units,
            product_price: row.product_price,
            discount: row.discount,
            total: row.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::SourceIndex;
    use devav_model::{EntityId, SourceId, TransformError};
    use devav_store::MemoryTargetStore;

    #[test]
    fn order_requires_its_customer() {
        let index = SourceIndex::new();
        index
            .register(EntityKind::Employee, SourceId(1), EntityId(1))
            .unwrap();
        index.seal();
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);

        let err = OrderImport::transform(
            OrderRow {
                id: SourceId(1),
                employee: Some(SourceId(1)),
                ..OrderRow::default()
            },
            &cx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MigrationError::Transform(TransformError::MissingReference {
                kind: EntityKind::Order,
                field: "Customer"
            })
        ));
    }

    #[test]
    fn courier_literal_is_mapped() {
        let index = SourceIndex::new();
        for (kind, id) in [
            (EntityKind::Employee, 1),
            (EntityKind::Customer, 2),
            (EntityKind::CustomerStore, 3),
        ] {
            index.register(kind, SourceId(id), EntityId(id as u64)).unwrap();
        }
        index.seal();
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);

        let order = OrderImport::transform(
            OrderRow {
                id: SourceId(9),
                employee: Some(SourceId(1)),
                customer: Some(SourceId(2)),
                store: Some(SourceId(3)),
                shipment_courier: 3,
                shipment_status: 2,
                ..OrderRow::default()
            },
            &cx,
        )
        .unwrap();
        assert_eq!(order.shipment_courier, ShipmentCourier::Dhl);
        assert_eq!(order.shipment_status, ShipmentStatus::Received);
        assert_eq!(order.store.map(|r| r.id()), Some(EntityId(3)));
    }
}
