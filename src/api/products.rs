//! Product endpoints.

use super::{
    ApiState,
    extract::{ApiJson, ApiPath},
    tenant::AdminId,
};
use crate::{
    core::product::{self, ProductInput, ProductWithSupplier},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Body of product writes
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    /// Product name
    pub name: Option<String>,
    /// Category
    pub category: Option<String>,
    /// Unit price
    pub price: Option<f64>,
    /// Units moved, or the new stock level on `PUT`
    pub stock_quantity: Option<i64>,
    /// Supplier id
    pub supplier: Option<i64>,
    /// `purchase` or `sale`
    pub transaction_type: Option<String>,
}

impl From<ProductPayload> for ProductInput {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.name,
            category: payload.category,
            price: payload.price,
            stock_quantity: payload.stock_quantity,
            supplier_id: payload.supplier,
            transaction_type: payload.transaction_type,
        }
    }
}

/// `POST /products`
pub async fn create_product(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiJson(payload): ApiJson<ProductPayload>,
) -> Result<(StatusCode, Json<Value>)> {
    let write = product::create_or_update_product(&state.database, admin_id, payload.into()).await?;
    let message = if write.created {
        "Product created successfully"
    } else {
        "Product updated successfully"
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": message, "product": write.product })),
    ))
}

/// `GET /products`
pub async fn list_products(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
) -> Result<Json<Vec<ProductWithSupplier>>> {
    Ok(Json(product::get_products(&state.database, admin_id).await?))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ProductWithSupplier>> {
    product::get_product_by_id(&state.database, admin_id, id)
        .await?
        .map(Json)
        .ok_or(Error::ProductNotFound { id })
}

/// `PUT /products/{id}`
pub async fn update_product(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ProductPayload>,
) -> Result<Json<Value>> {
    let write = product::update_product(&state.database, admin_id, id, payload.into()).await?;
    Ok(Json(json!({
        "message": "Product updated successfully",
        "product": write.product,
    })))
}

/// `DELETE /products/{id}`
pub async fn delete_product(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>> {
    product::delete_product(&state.database, admin_id, id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

/// `GET /products/trending`
pub async fn trending_product(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
) -> Result<Json<Value>> {
    let trending = product::get_top_trending_product(&state.database, admin_id).await?;
    Ok(Json(json!({
        "message": "Top trending product retrieved successfully",
        "product": trending,
    })))
}
