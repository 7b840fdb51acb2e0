//! Supplier endpoints.

use super::{
    ApiState,
    extract::{ApiJson, ApiPath},
    tenant::AdminId,
};
use crate::{
    core::supplier::{self, SupplierDetails, SupplierInput},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Body of supplier writes
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    /// Supplier name
    pub name: Option<String>,
    /// Contact details
    pub contact_info: Option<String>,
    /// Postal address
    pub address: Option<String>,
}

impl From<SupplierPayload> for SupplierInput {
    fn from(payload: SupplierPayload) -> Self {
        Self {
            name: payload.name,
            contact_info: payload.contact_info,
            address: payload.address,
        }
    }
}

/// `POST /suppliers`
pub async fn create_supplier(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiJson(payload): ApiJson<SupplierPayload>,
) -> Result<(StatusCode, Json<Value>)> {
    let supplier = supplier::create_supplier(&state.database, admin_id, payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Supplier created successfully", "supplier": supplier })),
    ))
}

/// `GET /suppliers`
pub async fn list_suppliers(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
) -> Result<Json<Vec<SupplierDetails>>> {
    Ok(Json(supplier::get_suppliers(&state.database, admin_id).await?))
}

/// `GET /suppliers/{id}`
pub async fn get_supplier(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<SupplierDetails>> {
    supplier::get_supplier_by_id(&state.database, admin_id, id)
        .await?
        .map(Json)
        .ok_or(Error::SupplierNotFound { id })
}

/// `PUT /suppliers/{id}`
pub async fn update_supplier(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<SupplierPayload>,
) -> Result<Json<Value>> {
    let details = supplier::update_supplier(&state.database, admin_id, id, payload.into()).await?;
    Ok(Json(json!({
        "message": "Supplier updated successfully",
        "supplier": details,
    })))
}

/// `DELETE /suppliers/{id}`
pub async fn delete_supplier(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>> {
    supplier::delete_supplier(&state.database, admin_id, id).await?;
    Ok(Json(json!({ "message": "Supplier deleted successfully" })))
}
