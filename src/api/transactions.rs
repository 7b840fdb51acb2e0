//! Transaction history and report endpoints.

use super::{ApiState, extract::ApiQuery, tenant::AdminId};
use crate::{
    core::{
        report::{self, DailySales},
        transaction::{self, TransactionFilter, TransactionSort},
    },
    entities::{TransactionType, transaction as transaction_entity},
    errors::Result,
};
use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;

/// Query string of `GET /transactions`
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    /// `date` or `-date`
    pub sort: Option<String>,
    /// Product id
    pub product: Option<i64>,
    /// `purchase` or `sale`
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl TryFrom<TransactionQuery> for TransactionFilter {
    type Error = crate::errors::Error;

    fn try_from(query: TransactionQuery) -> Result<Self> {
        Ok(Self {
            product_id: query.product,
            transaction_type: query
                .transaction_type
                .as_deref()
                .map(str::parse::<TransactionType>)
                .transpose()?,
            sort: query
                .sort
                .as_deref()
                .map(str::parse::<TransactionSort>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Query string of `GET /reports/daily-sales`
#[derive(Debug, Default, Deserialize)]
pub struct DailySalesQuery {
    /// Product id
    pub product: Option<i64>,
}

/// `GET /transactions`
pub async fn list_transactions(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Json<Vec<transaction_entity::Model>>> {
    let filter = TransactionFilter::try_from(query)?;
    Ok(Json(
        transaction::get_transactions(&state.database, admin_id, &filter).await?,
    ))
}

/// `GET /reports/daily-sales`
pub async fn daily_sales(
    State(state): State<ApiState>,
    AdminId(admin_id): AdminId,
    ApiQuery(query): ApiQuery<DailySalesQuery>,
) -> Result<Json<Vec<DailySales>>> {
    Ok(Json(
        report::daily_sales(&state.database, admin_id, query.product).await?,
    ))
}
