//! Report generation business logic.
//!
//! This module turns transaction history into summaries. The daily sales series is the
//! input a demand forecast is fitted on: sales only, bucketed per UTC day and product.
//! The formatting helpers are used for log lines.

use crate::{
    core::transaction::{TransactionFilter, TransactionSort, get_transactions},
    entities::{TransactionType, transaction},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::BTreeMap;

/// Units and revenue sold for one product on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    /// Calendar day (UTC)
    pub date: NaiveDate,
    /// Product name as recorded on the transactions
    pub product_name: String,
    /// Units sold that day
    pub quantity: i64,
    /// Revenue that day
    pub amount: f64,
}

/// Builds the per-day, per-product sales series for an admin.
///
/// Rows are ordered by day, then product name. Purchases are ignored.
///
/// # Arguments
/// * `db` - Database connection
/// * `admin_id` - Owner of the transactions
/// * `product_id` - Restrict the series to one product
pub async fn daily_sales(
    db: &DatabaseConnection,
    admin_id: i64,
    product_id: Option<i64>,
) -> Result<Vec<DailySales>> {
    let filter = TransactionFilter {
        product_id,
        transaction_type: Some(TransactionType::Sale),
        sort: TransactionSort::DateAsc,
    };
    let sales = get_transactions(db, admin_id, &filter).await?;
    Ok(bucket_by_day(&sales))
}

/// Groups sale transactions into [`DailySales`] rows.
#[must_use]
pub fn bucket_by_day(transactions: &[transaction::Model]) -> Vec<DailySales> {
    let mut buckets: BTreeMap<(NaiveDate, &str), (i64, f64)> = BTreeMap::new();

    for t in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Sale)
    {
        let entry = buckets
            .entry((t.date.date_naive(), t.product_name.as_str()))
            .or_insert((0, 0.0));
        entry.0 += t.quantity;
        entry.1 += t.amount;
    }

    buckets
        .into_iter()
        .map(|((date, product_name), (quantity, amount))| DailySales {
            date,
            product_name: product_name.to_string(),
            quantity,
            amount,
        })
        .collect()
}

/// Formats a dollar amount, e.g. `"$12.50"`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Generates a summary line for a transaction.
///
/// # Returns
/// Formatted summary string, e.g. `"sale | 3 x Linen Shirt | $89.97"`
#[must_use]
pub fn summarize_transaction(transaction: &transaction::Model) -> String {
    format!(
        "{} | {} x {} | {}",
        transaction.transaction_type,
        transaction.quantity,
        transaction.product_name,
        format_amount(transaction.amount)
    )
}
