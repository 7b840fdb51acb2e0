//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        product::{self, ProductInput, ProductWrite},
        supplier::{self, SupplierInput},
        user,
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an admin user with the given username.
pub async fn create_test_admin(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        format!("Test {username}"),
        username.to_string(),
        Some(format!("{username}@example.com")),
    )
    .await
}

/// Sets up a database with one admin user.
/// Returns (db, admin) for most scenarios.
pub async fn setup_with_admin() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let admin = create_test_admin(&db, "johndoe").await?;
    Ok((db, admin))
}

/// Creates a supplier with only a name.
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    admin_id: i64,
    name: &str,
) -> Result<entities::supplier::Model> {
    supplier::create_supplier(
        db,
        admin_id,
        SupplierInput {
            name: Some(name.to_string()),
            ..SupplierInput::default()
        },
    )
    .await
}

/// Purchases `quantity` units of the named product, creating it if needed.
///
/// # Defaults
/// * `category`: "General"
pub async fn purchase_product(
    db: &DatabaseConnection,
    admin_id: i64,
    name: &str,
    price: f64,
    quantity: i64,
    supplier_id: Option<i64>,
) -> Result<ProductWrite> {
    product::create_or_update_product(
        db,
        admin_id,
        ProductInput {
            name: Some(name.to_string()),
            category: Some("General".to_string()),
            price: Some(price),
            stock_quantity: Some(quantity),
            supplier_id,
            transaction_type: Some("purchase".to_string()),
        },
    )
    .await
}

/// Sells `quantity` units of an existing product. The product ends up without a supplier.
pub async fn sell_product(
    db: &DatabaseConnection,
    admin_id: i64,
    name: &str,
    price: f64,
    quantity: i64,
) -> Result<ProductWrite> {
    product::create_or_update_product(
        db,
        admin_id,
        ProductInput {
            name: Some(name.to_string()),
            category: Some("General".to_string()),
            price: Some(price),
            stock_quantity: Some(quantity),
            supplier_id: None,
            transaction_type: Some("sale".to_string()),
        },
    )
    .await
}
