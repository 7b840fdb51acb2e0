//! Unified error type for the inventory service.
//!
//! Variants are split the same way the HTTP layer reports them: caller mistakes and
//! business-rule violations carry enough detail for a readable message, everything else
//! is infrastructure and is hidden behind a generic server error.

use crate::entities::TransactionType;
use thiserror::Error;

/// Every failure the crate can produce
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database driver or ORM failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (config file, listener)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request carried no tenant, or one that does not exist
    #[error("Not authorized")]
    Unauthorized,

    /// Request body, path or query string could not be decoded
    #[error("{message}")]
    InvalidRequest {
        /// Decoder's description of the problem
        message: String,
    },

    /// A required request field was absent or blank
    #[error("{field} is required")]
    MissingField {
        /// Name of the field as it appears in request bodies
        field: &'static str,
    },

    /// Transaction type other than `purchase` or `sale`
    #[error("Transaction type must be either 'purchase' or 'sale' (got '{value}')")]
    InvalidTransactionType {
        /// The rejected value
        value: String,
    },

    /// Query string value that cannot be interpreted (e.g., an unknown sort key)
    #[error("Invalid query parameter '{parameter}': {value}")]
    InvalidQuery {
        /// Parameter name
        parameter: &'static str,
        /// The rejected value
        value: String,
    },

    /// Price is negative, zero, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Stock quantity is negative
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// A sale or stock change would drive stock below zero
    #[error("Sale quantity cannot exceed available stock (available {available}, requested {requested})")]
    InsufficientStock {
        /// Units on hand
        available: i64,
        /// Units the sale asked for
        requested: i64,
    },

    /// Attempt to open a new product with a sale
    #[error("Cannot create a new product with a sale transaction")]
    SaleOnNewProduct {
        /// Name of the product that does not exist yet
        name: String,
    },

    /// Declared transaction type contradicts the direction of the stock change
    #[error("Transaction type '{declared}' does not match a stock change of {delta}")]
    TransactionTypeMismatch {
        /// Type the caller declared
        declared: TransactionType,
        /// Signed stock change the request implies
        delta: i64,
    },

    /// Product does not exist for this admin
    #[error("Product not found")]
    ProductNotFound {
        /// Requested product id
        id: i64,
    },

    /// Supplier lookup on a supplier endpoint failed
    #[error("Supplier not found")]
    SupplierNotFound {
        /// Requested supplier id
        id: i64,
    },

    /// A product write referenced a supplier that does not exist for this admin
    #[error("Supplier not found")]
    InvalidSupplier {
        /// Referenced supplier id
        id: i64,
    },

    /// The admin has no transactions to rank
    #[error("No trending product found")]
    NoTrendingProduct,

    /// Another product of this admin already uses the name
    #[error("A product named '{name}' already exists")]
    DuplicateProductName {
        /// The conflicting name
        name: String,
    },

    /// Username already taken
    #[error("Username '{username}' is already taken")]
    DuplicateUsername {
        /// The conflicting username
        username: String,
    },

    /// Stock changed between read and write
    #[error("Product was modified concurrently, retry the request")]
    ConcurrentModification {
        /// Product whose stock moved underneath the request
        product_id: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
