//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL. Creation order
//! follows the foreign keys: users, suppliers, products, transactions, then the
//! supplier/product link table.

use crate::entities::{Product, Supplier, SupplierProduct, Transaction, User, product};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/stockroom.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a local `SQLite` file (created on first use) if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to the default local `SQLite` file if no environment variable is set, creating
/// its `data/` directory when missing.
#[instrument]
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if database_url == DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Existing tables are left alone, so this is safe to call on every start.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Supplier),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Transaction),
        schema.create_table_from_entity(SupplierProduct),
    ];

    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    // Product names are unique per admin
    let product_name_index = Index::create()
        .name("idx_products_admin_name")
        .table(Product)
        .col(product::Column::AdminId)
        .col(product::Column::Name)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&product_name_index)).await?;

    info!("Database tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        product::Model as ProductModel, supplier::Model as SupplierModel,
        supplier_product::Model as SupplierProductModel, transaction::Model as TransactionModel,
        user::Model as UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<SupplierModel> = Supplier::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;
        let _: Vec<SupplierProductModel> = SupplierProduct::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_product_names_unique_per_admin() -> Result<()> {
        use crate::entities::{product, user};
        use sea_orm::{ActiveModelTrait, Set, SqlErr};

        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let now = chrono::Utc::now();
        let mut admin_ids = Vec::new();
        for username in ["alice", "bob"] {
            let admin = user::ActiveModel {
                name: Set(username.to_string()),
                username: Set(username.to_string()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&db)
            .await?;
            admin_ids.push(admin.id);
        }

        let product_for = |admin_id: i64| product::ActiveModel {
            admin_id: Set(admin_id),
            name: Set("Shirt".to_string()),
            price: Set(10.0),
            stock_quantity: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        product_for(admin_ids[0]).insert(&db).await?;
        // Same name under another admin is fine
        product_for(admin_ids[1]).insert(&db).await?;

        let duplicate = product_for(admin_ids[0]).insert(&db).await;
        assert!(matches!(
            duplicate.map_err(|e| e.sql_err()),
            Err(Some(SqlErr::UniqueConstraintViolation(_)))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
