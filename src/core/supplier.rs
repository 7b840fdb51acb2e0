//! Supplier business logic - suppliers and their `productsSupplied` back-references.
//!
//! The back-reference set lives in the `supplier_products` link table. Product writes keep
//! it in step through [`link_product`], [`unlink_product_everywhere`] and
//! [`move_product_link`], always inside the caller's database transaction.

use crate::{
    entities::{
        Product, Supplier, SupplierProduct, Transaction, product, supplier, supplier_product,
        transaction,
    },
    errors::{Error, Result},
};
use sea_orm::{FromQueryResult, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Supplier fields as they arrive from a request
#[derive(Debug, Clone, Default)]
pub struct SupplierInput {
    /// Supplier name (required on create)
    pub name: Option<String>,
    /// Contact details
    pub contact_info: Option<String>,
    /// Postal address
    pub address: Option<String>,
}

/// A supplier with its supplied products expanded and its sales total
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDetails {
    /// The supplier itself
    #[serde(flatten)]
    pub supplier: supplier::Model,
    /// Products in the supplier's back-reference set
    pub products_supplied: Vec<product::Model>,
    /// Sum of `amount` over the admin's transactions for those products
    pub total_transactions: f64,
}

#[derive(Debug, FromQueryResult)]
struct AmountTotal {
    total: Option<f64>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Finds an admin's supplier by id on any connection or open transaction.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_supplier<C>(
    db: &C,
    admin_id: i64,
    supplier_id: i64,
) -> Result<Option<supplier::Model>>
where
    C: ConnectionTrait,
{
    Supplier::find_by_id(supplier_id)
        .filter(supplier::Column::AdminId.eq(admin_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a product to a supplier's back-reference set. Adding an existing member is a no-op.
///
/// # Errors
/// Returns an error if a database operation fails.
pub async fn link_product<C>(db: &C, supplier_id: i64, product_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    if SupplierProduct::find_by_id((supplier_id, product_id))
        .one(db)
        .await?
        .is_some()
    {
        return Ok(());
    }

    supplier_product::ActiveModel {
        supplier_id: Set(supplier_id),
        product_id: Set(product_id),
    }
    .insert(db)
    .await?;
    debug!(supplier_id, product_id, "Linked product to supplier");
    Ok(())
}

/// Removes a product from one supplier's back-reference set.
///
/// # Errors
/// Returns an error if the delete fails.
pub async fn unlink_product<C>(db: &C, supplier_id: i64, product_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    SupplierProduct::delete_many()
        .filter(supplier_product::Column::SupplierId.eq(supplier_id))
        .filter(supplier_product::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    debug!(supplier_id, product_id, "Unlinked product from supplier");
    Ok(())
}

/// Removes a product from every supplier's back-reference set.
///
/// # Errors
/// Returns an error if the delete fails.
pub async fn unlink_product_everywhere<C>(db: &C, product_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    SupplierProduct::delete_many()
        .filter(supplier_product::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Moves a product's back-reference from one supplier to another.
///
/// Either side may be `None` (product gaining its first supplier, or losing its last).
///
/// # Errors
/// Returns an error if a database operation fails.
pub async fn move_product_link<C>(
    db: &C,
    product_id: i64,
    from: Option<i64>,
    to: Option<i64>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if from == to {
        return Ok(());
    }
    if let Some(old) = from {
        unlink_product(db, old, product_id).await?;
    }
    if let Some(new) = to {
        link_product(db, new, product_id).await?;
    }
    Ok(())
}

/// Expands the back-reference set and totals the matching transactions.
async fn with_details<C>(db: &C, admin_id: i64, supplier: supplier::Model) -> Result<SupplierDetails>
where
    C: ConnectionTrait,
{
    let product_ids: Vec<i64> = SupplierProduct::find()
        .filter(supplier_product::Column::SupplierId.eq(supplier.id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.product_id)
        .collect();

    if product_ids.is_empty() {
        return Ok(SupplierDetails {
            supplier,
            products_supplied: Vec::new(),
            total_transactions: 0.0,
        });
    }

    let products_supplied = Product::find()
        .filter(product::Column::Id.is_in(product_ids.clone()))
        .filter(product::Column::AdminId.eq(admin_id))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await?;

    let total_transactions = Transaction::find()
        .select_only()
        .column_as(transaction::Column::Amount.sum(), "total")
        .filter(transaction::Column::ProductId.is_in(product_ids))
        .filter(transaction::Column::AdminId.eq(admin_id))
        .into_model::<AmountTotal>()
        .one(db)
        .await?
        .and_then(|row| row.total)
        .unwrap_or(0.0);

    Ok(SupplierDetails {
        supplier,
        products_supplied,
        total_transactions,
    })
}

/// Creates a supplier for an admin.
///
/// # Errors
/// Returns an error if:
/// - The name is missing or blank
/// - The database insert operation fails
#[instrument(skip(db, input))]
pub async fn create_supplier(
    db: &DatabaseConnection,
    admin_id: i64,
    input: SupplierInput,
) -> Result<supplier::Model> {
    let name = trimmed(input.name).ok_or(Error::MissingField { field: "name" })?;

    let now = chrono::Utc::now();
    let supplier = supplier::ActiveModel {
        admin_id: Set(admin_id),
        name: Set(name),
        contact_info: Set(trimmed(input.contact_info)),
        address: Set(trimmed(input.address)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(supplier_id = supplier.id, "Created supplier {}", supplier.name);
    Ok(supplier)
}

/// Retrieves all of an admin's suppliers with products and totals, ordered by name.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn get_suppliers(db: &DatabaseConnection, admin_id: i64) -> Result<Vec<SupplierDetails>> {
    let suppliers = Supplier::find()
        .filter(supplier::Column::AdminId.eq(admin_id))
        .order_by_asc(supplier::Column::Name)
        .all(db)
        .await?;

    let mut details = Vec::with_capacity(suppliers.len());
    for supplier in suppliers {
        details.push(with_details(db, admin_id, supplier).await?);
    }
    Ok(details)
}

/// Retrieves one supplier with products and totals, or `None` if the admin has no such supplier.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn get_supplier_by_id(
    db: &DatabaseConnection,
    admin_id: i64,
    supplier_id: i64,
) -> Result<Option<SupplierDetails>> {
    match find_supplier(db, admin_id, supplier_id).await? {
        Some(supplier) => Ok(Some(with_details(db, admin_id, supplier).await?)),
        None => Ok(None),
    }
}

/// Replaces the supplier fields present in `input`; absent fields keep their value.
///
/// # Errors
/// Returns an error if:
/// - A name is given but blank
/// - The supplier does not exist for this admin
/// - A database operation fails
#[instrument(skip(db, input))]
pub async fn update_supplier(
    db: &DatabaseConnection,
    admin_id: i64,
    supplier_id: i64,
    input: SupplierInput,
) -> Result<SupplierDetails> {
    let name = match input.name {
        Some(name) => Some(trimmed(Some(name)).ok_or(Error::MissingField { field: "name" })?),
        None => None,
    };

    let current = find_supplier(db, admin_id, supplier_id)
        .await?
        .ok_or(Error::SupplierNotFound { id: supplier_id })?;

    let mut active: supplier::ActiveModel = current.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if input.contact_info.is_some() {
        active.contact_info = Set(trimmed(input.contact_info));
    }
    if input.address.is_some() {
        active.address = Set(trimmed(input.address));
    }
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;

    info!(supplier_id, "Updated supplier {}", updated.name);
    with_details(db, admin_id, updated).await
}

/// Deletes a supplier and detaches it from the admin's products.
///
/// Products referencing the supplier have their `supplier_id` cleared and the back-reference
/// set is emptied. Transactions keep their supplier snapshot. Returns the deleted supplier.
///
/// # Errors
/// Returns an error if:
/// - The supplier does not exist for this admin
/// - A database operation fails
#[instrument(skip(db))]
pub async fn delete_supplier(
    db: &DatabaseConnection,
    admin_id: i64,
    supplier_id: i64,
) -> Result<supplier::Model> {
    let txn = db.begin().await?;

    let supplier = find_supplier(&txn, admin_id, supplier_id)
        .await?
        .ok_or(Error::SupplierNotFound { id: supplier_id })?;

    let detached = Product::update_many()
        .set(product::ActiveModel {
            supplier_id: Set(None),
            ..Default::default()
        })
        .filter(product::Column::SupplierId.eq(supplier_id))
        .filter(product::Column::AdminId.eq(admin_id))
        .exec(&txn)
        .await?;

    SupplierProduct::delete_many()
        .filter(supplier_product::Column::SupplierId.eq(supplier_id))
        .exec(&txn)
        .await?;

    supplier.clone().delete(&txn).await?;

    txn.commit().await?;

    info!(
        supplier_id,
        products_detached = detached.rows_affected,
        "Deleted supplier {}",
        supplier.name
    );
    Ok(supplier)
}
