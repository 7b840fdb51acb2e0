//! Error to HTTP response mapping.
//!
//! Client errors are returned as `{"message": ...}` with the error's own text. Server
//! errors are logged here and replaced with a generic message.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Status code an error is reported with
#[must_use]
pub const fn status_code(error: &Error) -> StatusCode {
    match error {
        Error::Unauthorized => StatusCode::UNAUTHORIZED,
        Error::InvalidRequest { .. }
        | Error::MissingField { .. }
        | Error::InvalidTransactionType { .. }
        | Error::InvalidQuery { .. }
        | Error::InvalidAmount { .. }
        | Error::InvalidQuantity { .. }
        | Error::InsufficientStock { .. }
        | Error::SaleOnNewProduct { .. }
        | Error::TransactionTypeMismatch { .. }
        | Error::InvalidSupplier { .. } => StatusCode::BAD_REQUEST,
        Error::ProductNotFound { .. }
        | Error::SupplierNotFound { .. }
        | Error::NoTrendingProduct => StatusCode::NOT_FOUND,
        Error::DuplicateProductName { .. }
        | Error::DuplicateUsername { .. }
        | Error::ConcurrentModification { .. } => StatusCode::CONFLICT,
        Error::Config { .. } | Error::Database(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
