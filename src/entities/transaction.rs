//! Transaction entity - An immutable record of stock moving in or out.
//!
//! Each row snapshots the product name and price at the time it was written, so history
//! stays readable after the product changes. `quantity` is always a magnitude; the
//! direction comes from `transaction_type`. `supplier_id` is a snapshot too and carries
//! no foreign key, so removing a supplier leaves its history alone.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Direction of a stock movement
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Stock bought in; adds to the product's stock
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Stock sold; subtracts from the product's stock
    #[sea_orm(string_value = "sale")]
    Sale,
}

impl TransactionType {
    /// The wire/database spelling of this type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
        }
    }

    /// Signed stock delta for `quantity` units of this type
    #[must_use]
    pub const fn signed(self, quantity: i64) -> i64 {
        match self {
            Self::Purchase => quantity,
            Self::Sale => -quantity,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "purchase" => Ok(Self::Purchase),
            "sale" => Ok(Self::Sale),
            other => Err(Error::InvalidTransactionType {
                value: other.to_string(),
            }),
        }
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning admin user
    pub admin_id: i64,
    /// Product whose stock moved
    pub product_id: i64,
    /// Product name at the time of the transaction
    pub product_name: String,
    /// Unit price at the time of the transaction
    pub product_price: f64,
    /// Number of units moved (never negative)
    pub quantity: i64,
    /// Purchase or sale
    pub transaction_type: TransactionType,
    /// `product_price * quantity`
    pub amount: f64,
    /// When the transaction happened
    pub date: DateTimeUtc,
    /// Supplier linked to the product when the transaction was written
    pub supplier_id: Option<i64>,
}

impl Model {
    /// Signed effect of this transaction on the product's stock
    #[must_use]
    pub const fn stock_delta(&self) -> i64 {
        self.transaction_type.signed(self.quantity)
    }
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one admin
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AdminId",
        to = "super::user::Column::Id"
    )]
    Admin,
    /// Each transaction belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!(
            "purchase".parse::<TransactionType>().ok(),
            Some(TransactionType::Purchase)
        );
        assert_eq!(
            "sale".parse::<TransactionType>().ok(),
            Some(TransactionType::Sale)
        );
        assert!(matches!(
            "refund".parse::<TransactionType>(),
            Err(Error::InvalidTransactionType { value }) if value == "refund"
        ));
        // Case matters on the wire
        assert!("Sale".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_transaction_type_signed() {
        assert_eq!(TransactionType::Purchase.signed(5), 5);
        assert_eq!(TransactionType::Sale.signed(5), -5);
        assert_eq!(TransactionType::Sale.to_string(), "sale");
    }
}
