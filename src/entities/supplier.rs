//! Supplier entity - A vendor that products are bought from.
//!
//! The set of products a supplier provides is kept in the `supplier_products` link table
//! rather than on this row; see [`super::supplier_product`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the supplier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning admin user
    pub admin_id: i64,
    /// Supplier name (e.g., "Acme Textiles")
    pub name: String,
    /// Free-form contact details (phone, email)
    pub contact_info: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// When the supplier was created
    pub created_at: DateTimeUtc,
    /// When the supplier was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Supplier and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each supplier belongs to one admin
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AdminId",
        to = "super::user::Column::Id"
    )]
    Admin,
    /// Products currently pointing at this supplier
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
    /// Back-reference rows listing the products this supplier provides
    #[sea_orm(has_many = "super::supplier_product::Entity")]
    SuppliedProducts,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::supplier_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuppliedProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
