//! Supplier/product link entity - the `productsSupplied` back-reference set.
//!
//! One row per (supplier, product) pair. The composite primary key gives set semantics:
//! a product appears at most once in a supplier's list.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Link row between a supplier and a product it supplies
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Supplier side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub supplier_id: i64,
    /// Product side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,
}

/// Defines relationships between the link row and its two ends
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The supplier that provides the product
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
    /// The product being supplied
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
