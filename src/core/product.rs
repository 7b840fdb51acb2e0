//! Product business logic - products, stock levels and the trending report.
//!
//! Every write that changes stock does three things inside one database transaction:
//! the product row changes, a transaction record is appended, and the supplier
//! back-reference set is kept in step. Either all of them commit or none do.
//!
//! Stock is never written from a value read earlier in the request without a guard:
//! - create-or-update adjusts stock with `stock_quantity = stock_quantity + delta`,
//!   conditioned on enough stock for a sale;
//! - update-by-id sets an absolute level, conditioned on the level it read.

use crate::{
    core::{report, supplier as supplier_core, transaction as transaction_core},
    entities::{Product, Supplier, Transaction, TransactionType, product, supplier, transaction},
    errors::{Error, Result},
};
use sea_orm::{
    FromQueryResult, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Raw product fields as they arrive from a request.
///
/// Everything is optional here so that validation, and its error messages, live in this
/// module rather than in the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    /// Product name (required)
    pub name: Option<String>,
    /// Category; blank is stored as `None`
    pub category: Option<String>,
    /// Unit price (required, positive)
    pub price: Option<f64>,
    /// Create-or-update: units moved. Update-by-id: the new absolute stock level.
    pub stock_quantity: Option<i64>,
    /// Supplier to link, `None` to unlink
    pub supplier_id: Option<i64>,
    /// `"purchase"` or `"sale"` (required)
    pub transaction_type: Option<String>,
}

/// Outcome of a product write
#[derive(Debug, Clone)]
pub struct ProductWrite {
    /// The product as stored after the write
    pub product: product::Model,
    /// The transaction appended by the write, if any
    pub transaction: Option<transaction::Model>,
    /// Whether the write created the product
    pub created: bool,
}

/// A product with its supplier reference expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithSupplier {
    /// The product itself
    #[serde(flatten)]
    pub product: product::Model,
    /// The referenced supplier, if any
    pub supplier: Option<supplier::Model>,
}

/// The product with the highest total transaction quantity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingProduct {
    /// The product itself
    #[serde(flatten)]
    pub product: product::Model,
    /// Sum of `quantity` over all of the product's transactions
    pub total_quantity_sold: i64,
    /// Sum of `amount` over all of the product's transactions
    pub total_amount_sold: f64,
}

#[derive(Debug, FromQueryResult)]
struct ProductTotals {
    product_id: i64,
    total_quantity: i64,
    total_amount: f64,
}

fn required_name(name: Option<String>) -> Result<String> {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or(Error::MissingField { field: "name" })
}

fn validated_price(price: Option<f64>) -> Result<f64> {
    let price = price.ok_or(Error::MissingField { field: "price" })?;
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(price)
}

fn parsed_transaction_type(value: Option<&str>) -> Result<TransactionType> {
    match value.map(str::trim) {
        None | Some("") => Err(Error::MissingField {
            field: "transactionType",
        }),
        Some(value) => value.parse(),
    }
}

/// Maps a unique-index violation on `(admin_id, name)` to a name conflict.
fn name_conflict(err: DbErr, name: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateProductName {
            name: name.to_string(),
        },
        _ => err.into(),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Retrieves all of an admin's products with their suppliers, ordered by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_products(
    db: &DatabaseConnection,
    admin_id: i64,
) -> Result<Vec<ProductWithSupplier>> {
    let rows = Product::find()
        .filter(product::Column::AdminId.eq(admin_id))
        .order_by_asc(product::Column::Name)
        .find_also_related(Supplier)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(product, supplier)| ProductWithSupplier { product, supplier })
        .collect())
}

/// Retrieves one product with its supplier, or `None` if the admin has no such product.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    admin_id: i64,
    product_id: i64,
) -> Result<Option<ProductWithSupplier>> {
    let row = Product::find_by_id(product_id)
        .filter(product::Column::AdminId.eq(admin_id))
        .find_also_related(Supplier)
        .one(db)
        .await?;

    Ok(row.map(|(product, supplier)| ProductWithSupplier { product, supplier }))
}

/// Finds an admin's product by its exact name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_name<C>(
    db: &C,
    admin_id: i64,
    name: &str,
) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::AdminId.eq(admin_id))
        .filter(product::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds `delta` to a product's stock in a single statement.
///
/// A negative delta only applies when at least `-delta` units are on hand, so two
/// concurrent sales can never take stock below zero. A positive delta only applies when
/// the result still fits in an `i64`.
async fn adjust_stock<C>(db: &C, product_id: i64, delta: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let update = Product::update_many()
        .col_expr(
            product::Column::StockQuantity,
            Expr::col(product::Column::StockQuantity).add(delta),
        )
        .filter(product::Column::Id.eq(product_id));
    let update = if delta < 0 {
        update.filter(product::Column::StockQuantity.gte(-delta))
    } else {
        update.filter(product::Column::StockQuantity.lte(i64::MAX - delta))
    };

    let result = update.exec(db).await?;

    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if result.rows_affected == 0 {
        return Err(if delta < 0 {
            Error::InsufficientStock {
                available: product.stock_quantity,
                requested: -delta,
            }
        } else {
            Error::InvalidQuantity { quantity: delta }
        });
    }
    Ok(product)
}

/// Creates a product, or updates the admin's product of the same name, and records the
/// stock movement.
///
/// - `name`, `price` and `transactionType` are required; `stockQuantity` defaults to 0.
/// - A new product can only be opened with a purchase.
/// - A sale on an existing product may not exceed its stock.
/// - A non-zero quantity appends one transaction and moves stock by that amount.
/// - The supplier back-reference follows the product's supplier.
///
/// # Errors
/// Returns an error if:
/// - A required field is missing, the price is not positive, or the quantity is negative
/// - The transaction type is not `purchase` or `sale`
/// - The supplier does not exist for this admin
/// - The product is new and the transaction is a sale
/// - The sale exceeds available stock
/// - Any database operation fails
#[instrument(skip(db, input))]
pub async fn create_or_update_product(
    db: &DatabaseConnection,
    admin_id: i64,
    input: ProductInput,
) -> Result<ProductWrite> {
    let name = required_name(input.name)?;
    let price = validated_price(input.price)?;
    let transaction_type = parsed_transaction_type(input.transaction_type.as_deref())?;
    let quantity = input.stock_quantity.unwrap_or(0);
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    let category = optional_text(input.category);
    let supplier_id = input.supplier_id;

    let txn = db.begin().await?;

    if let Some(id) = supplier_id {
        supplier_core::find_supplier(&txn, admin_id, id)
            .await?
            .ok_or(Error::InvalidSupplier { id })?;
    }

    let now = chrono::Utc::now();
    let (product, created) = match get_product_by_name(&txn, admin_id, &name).await? {
        Some(current) => {
            if transaction_type == TransactionType::Sale && quantity > current.stock_quantity {
                return Err(Error::InsufficientStock {
                    available: current.stock_quantity,
                    requested: quantity,
                });
            }

            let previous_supplier = current.supplier_id;
            let mut active: product::ActiveModel = current.into();
            active.category = Set(category);
            active.price = Set(price);
            active.supplier_id = Set(supplier_id);
            active.updated_at = Set(now);
            let updated = active.update(&txn).await?;

            if previous_supplier != supplier_id {
                supplier_core::move_product_link(&txn, updated.id, previous_supplier, supplier_id)
                    .await?;
            }
            (updated, false)
        }
        None => {
            if transaction_type == TransactionType::Sale {
                return Err(Error::SaleOnNewProduct { name });
            }

            let inserted = product::ActiveModel {
                admin_id: Set(admin_id),
                name: Set(name.clone()),
                category: Set(category),
                price: Set(price),
                stock_quantity: Set(0),
                supplier_id: Set(supplier_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| name_conflict(e, &name))?;

            if let Some(id) = supplier_id {
                supplier_core::link_product(&txn, id, inserted.id).await?;
            }
            (inserted, true)
        }
    };

    let (product, transaction) = if quantity == 0 {
        (product, None)
    } else {
        let adjusted = adjust_stock(&txn, product.id, transaction_type.signed(quantity)).await?;
        let record =
            transaction_core::record_transaction(&txn, &adjusted, quantity, transaction_type)
                .await?;
        (adjusted, Some(record))
    };

    txn.commit().await?;

    info!(
        product_id = product.id,
        created,
        "{} {} x {} at {}, stock now {}",
        transaction_type,
        quantity,
        product.name,
        report::format_amount(product.price),
        product.stock_quantity
    );

    Ok(ProductWrite {
        product,
        transaction,
        created,
    })
}

/// Replaces a product's fields and sets its stock to a new absolute level.
///
/// The stock change `delta = new - old` is recorded as one transaction of `|delta|` units
/// (a zero-unit record when the level is unchanged). The declared `transactionType` has to
/// agree with the direction of the change: a purchase cannot lower stock and a sale
/// cannot raise it.
///
/// # Errors
/// Returns an error if:
/// - The transaction type is missing or invalid
/// - `name`, `price` or `stockQuantity` is missing or invalid
/// - The product does not exist for this admin
/// - The new level is negative (`InvalidQuantity`), or contradicts the declared
///   transaction type
/// - The new name belongs to another of the admin's products
/// - The supplier does not exist for this admin
/// - The stock level changed while the request was in flight
/// - Any database operation fails
#[instrument(skip(db, input))]
pub async fn update_product(
    db: &DatabaseConnection,
    admin_id: i64,
    product_id: i64,
    input: ProductInput,
) -> Result<ProductWrite> {
    let transaction_type = parsed_transaction_type(input.transaction_type.as_deref())?;
    let name = required_name(input.name)?;
    let price = validated_price(input.price)?;
    let new_quantity = input.stock_quantity.ok_or(Error::MissingField {
        field: "stockQuantity",
    })?;
    let category = optional_text(input.category);
    let supplier_id = input.supplier_id;

    let txn = db.begin().await?;

    let current = Product::find_by_id(product_id)
        .filter(product::Column::AdminId.eq(admin_id))
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if new_quantity < 0 {
        return Err(Error::InvalidQuantity {
            quantity: new_quantity,
        });
    }
    // Both levels are non-negative, so the difference cannot overflow
    let old_quantity = current.stock_quantity;
    let delta = new_quantity - old_quantity;
    let direction_matches = match transaction_type {
        TransactionType::Purchase => delta >= 0,
        TransactionType::Sale => delta <= 0,
    };
    if !direction_matches {
        return Err(Error::TransactionTypeMismatch {
            declared: transaction_type,
            delta,
        });
    }

    if name != current.name
        && get_product_by_name(&txn, admin_id, &name).await?.is_some()
    {
        return Err(Error::DuplicateProductName { name });
    }

    if let Some(id) = supplier_id {
        supplier_core::find_supplier(&txn, admin_id, id)
            .await?
            .ok_or(Error::InvalidSupplier { id })?;
    }

    let changes = product::ActiveModel {
        name: Set(name.clone()),
        category: Set(category),
        price: Set(price),
        stock_quantity: Set(new_quantity),
        supplier_id: Set(supplier_id),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let result = Product::update_many()
        .set(changes)
        .filter(product::Column::Id.eq(product_id))
        .filter(product::Column::StockQuantity.eq(old_quantity))
        .exec(&txn)
        .await
        .map_err(|e| name_conflict(e, &name))?;
    if result.rows_affected == 0 {
        warn!(product_id, "Stock moved during update, rejecting");
        return Err(Error::ConcurrentModification { product_id });
    }

    let updated = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if current.supplier_id != supplier_id {
        supplier_core::move_product_link(&txn, product_id, current.supplier_id, supplier_id)
            .await?;
    }

    let record =
        transaction_core::record_transaction(&txn, &updated, delta.abs(), transaction_type)
            .await?;

    txn.commit().await?;

    info!(
        product_id,
        "Updated {}: stock {} -> {}", updated.name, old_quantity, updated.stock_quantity
    );

    Ok(ProductWrite {
        product: updated,
        transaction: Some(record),
        created: false,
    })
}

/// Deletes a product together with its history and its supplier back-references.
///
/// Returns the deleted product.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist for this admin
/// - Any database operation fails
#[instrument(skip(db))]
pub async fn delete_product(
    db: &DatabaseConnection,
    admin_id: i64,
    product_id: i64,
) -> Result<product::Model> {
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .filter(product::Column::AdminId.eq(admin_id))
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    supplier_core::unlink_product_everywhere(&txn, product_id).await?;

    let removed = Transaction::delete_many()
        .filter(transaction::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;

    product.clone().delete(&txn).await?;

    txn.commit().await?;

    info!(
        product_id,
        transactions_removed = removed.rows_affected,
        "Deleted product {}",
        product.name
    );
    Ok(product)
}

/// Finds the admin's product with the highest total transaction quantity.
///
/// Quantities and amounts of all transactions (purchases and sales) are summed per
/// product; ties go to the lowest product id.
///
/// # Errors
/// Returns an error if:
/// - The admin has no transactions, or the top product no longer exists
/// - The database query fails
pub async fn get_top_trending_product(
    db: &DatabaseConnection,
    admin_id: i64,
) -> Result<TrendingProduct> {
    let totals = Transaction::find()
        .select_only()
        .column(transaction::Column::ProductId)
        .column_as(transaction::Column::Quantity.sum(), "total_quantity")
        .column_as(transaction::Column::Amount.sum(), "total_amount")
        .filter(transaction::Column::AdminId.eq(admin_id))
        .group_by(transaction::Column::ProductId)
        .order_by_desc(transaction::Column::Quantity.sum())
        .order_by_asc(transaction::Column::ProductId)
        .into_model::<ProductTotals>()
        .one(db)
        .await?
        .ok_or(Error::NoTrendingProduct)?;

    let product = Product::find_by_id(totals.product_id)
        .filter(product::Column::AdminId.eq(admin_id))
        .one(db)
        .await?
        .ok_or(Error::NoTrendingProduct)?;

    Ok(TrendingProduct {
        product,
        total_quantity_sold: totals.total_quantity,
        total_amount_sold: totals.total_amount,
    })
}
