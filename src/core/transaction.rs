//! Transaction business logic - the stock movement history.
//!
//! Transactions are written only as a side effect of product writes (see
//! [`crate::core::product`]) through [`record_transaction`], and are never edited. This
//! module also provides the read side used by the transaction listing endpoint.

use crate::{
    core::report,
    entities::{Transaction, TransactionType, product, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::str::FromStr;
use tracing::debug;

/// Ordering for transaction listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionSort {
    /// Oldest first (`sort=date`)
    DateAsc,
    /// Newest first (`sort=-date`)
    #[default]
    DateDesc,
}

impl FromStr for TransactionSort {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "date" => Ok(Self::DateAsc),
            "-date" => Ok(Self::DateDesc),
            other => Err(Error::InvalidQuery {
                parameter: "sort",
                value: other.to_string(),
            }),
        }
    }
}

/// Optional narrowing for [`get_transactions`]
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only transactions for this product
    pub product_id: Option<i64>,
    /// Only purchases or only sales
    pub transaction_type: Option<TransactionType>,
    /// Result ordering
    pub sort: TransactionSort,
}

/// Appends a transaction for `quantity` units of `product`.
///
/// The product's current name, price and supplier are copied onto the row, and
/// `amount` is `price * quantity`. Callers pass their open database transaction so the
/// record commits or rolls back together with the stock change it describes.
///
/// # Errors
/// Returns an error if `quantity` is negative or the insert fails.
pub async fn record_transaction<C>(
    db: &C,
    product: &product::Model,
    quantity: i64,
    transaction_type: TransactionType,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    // Cast safety: stock counts are far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let amount = product.price * quantity as f64;

    let record = transaction::ActiveModel {
        admin_id: Set(product.admin_id),
        product_id: Set(product.id),
        product_name: Set(product.name.clone()),
        product_price: Set(product.price),
        quantity: Set(quantity),
        transaction_type: Set(transaction_type),
        amount: Set(amount),
        date: Set(chrono::Utc::now()),
        supplier_id: Set(product.supplier_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(
        product_id = product.id,
        "Recorded {}",
        report::summarize_transaction(&record)
    );
    Ok(record)
}

/// Lists an admin's transactions, filtered and sorted as requested.
///
/// Ties on `date` are broken by id in the same direction so the order is stable.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_transactions(
    db: &DatabaseConnection,
    admin_id: i64,
    filter: &TransactionFilter,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find().filter(transaction::Column::AdminId.eq(admin_id));

    if let Some(product_id) = filter.product_id {
        query = query.filter(transaction::Column::ProductId.eq(product_id));
    }
    if let Some(transaction_type) = filter.transaction_type {
        query = query.filter(transaction::Column::TransactionType.eq(transaction_type));
    }

    query = match filter.sort {
        TransactionSort::DateAsc => query
            .order_by_asc(transaction::Column::Date)
            .order_by_asc(transaction::Column::Id),
        TransactionSort::DateDesc => query
            .order_by_desc(transaction::Column::Date)
            .order_by_desc(transaction::Column::Id),
    };

    query.all(db).await.map_err(Into::into)
}

/// Retrieves the history of one product, newest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_transactions_for_product(
    db: &DatabaseConnection,
    admin_id: i64,
    product_id: i64,
) -> Result<Vec<transaction::Model>> {
    let filter = TransactionFilter {
        product_id: Some(product_id),
        ..TransactionFilter::default()
    };
    get_transactions(db, admin_id, &filter).await
}
