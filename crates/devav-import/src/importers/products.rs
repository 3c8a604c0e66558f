//! Products and their media

use super::{Transform, TransformContext};
use crate::error::MigrationError;
use devav_model::source::{ProductCatalogRow, ProductImageRow, ProductRow};
use devav_model::target::{Product, ProductCatalog, ProductImage};
use devav_model::{EntityKind, ProductCategory};

pub struct ProductImport;

impl Transform for ProductImport {
    type Row = ProductRow;
    type Target = Product;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::Employee, EntityKind::Picture];
    const INCLUDES: &'static [&'static str] = &["Engineer", "Support", "PrimaryImage"];

    fn transform(row: ProductRow, cx: &TransformContext<'_>) -> Result<Product, MigrationError> {
        const KIND: EntityKind = EntityKind::Product;
        Ok(Product {
            source_id: Some(row.id),
            category: ProductCategory::from_literal(row.category)?,
            engineer: Some(cx.require(KIND, "Engineer", row.engineer)?),
            support: Some(cx.require(KIND, "Support", row.support)?),
            primary_image: Some(cx.require(KIND, "PrimaryImage", row.primary_image)?),
            name: row.name,
            description: row.description,
            available: row.available,
            backorder: row.backorder,
            cost: row.cost,
            sale_price: row.sale_price,
            retail_price: row.retail_price,
            consumer_rating: row.consumer_rating,
            current_inventory: row.current_inventory,
            manufacturing: row.manufacturing,
            weight: row.weight,
            image: row.image,
            production_start: row.production_start,
        })
    }
}

pub struct ProductImageImport;

impl Transform for ProductImageImport {
    type Row = ProductImageRow;
    type Target = ProductImage;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::Product, EntityKind::Picture];
    const INCLUDES: &'static [&'static str] = &["Product", "Picture"];

    fn transform(
        row: ProductImageRow,
        cx: &TransformContext<'_>,
    ) -> Result<ProductImage, MigrationError> {
        const KIND: EntityKind = EntityKind::ProductImage;
        Ok(ProductImage {
            source_id: Some(row.id),
            product: Some(cx.require(KIND, "Product", row.product)?),
            picture: Some(cx.require(KIND, "Picture", row.picture)?),
        })
    }
}

pub struct ProductCatalogImport;

impl Transform for ProductCatalogImport {
    type Row = ProductCatalogRow;
    type Target = ProductCatalog;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::Product];
    const INCLUDES: &'static [&'static str] = &["Product"];

    fn transform(
        row: ProductCatalogRow,
        cx: &TransformContext<'_>,
    ) -> Result<ProductCatalog, MigrationError> {
        Ok(ProductCatalog {
            source_id: Some(row.id),
            product: Some(cx.require(EntityKind::ProductCatalog, "Product", row.product)?),
            pdf: row.pdf,
        })
    }
}
