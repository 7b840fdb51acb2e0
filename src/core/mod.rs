//! Core business logic - framework-agnostic product, supplier, transaction and report
//! operations. Every function here is scoped by the admin that owns the data.

/// Products, stock levels and the trending report
pub mod product;
/// Daily sales series and formatting helpers
pub mod report;
/// Suppliers and their `productsSupplied` back-references
pub mod supplier;
/// Immutable stock transaction records
pub mod transaction;
/// Admin user accounts
pub mod user;
