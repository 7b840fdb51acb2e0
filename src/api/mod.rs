//! HTTP layer.
//!
//! Thin axum handlers over [`crate::core`]: each one extracts the tenant, converts the
//! request body into a core input, and serializes the result. Errors become responses via
//! the [`IntoResponse`](axum::response::IntoResponse) impl in [`error`].

pub mod error;
pub mod extract;
pub mod products;
pub mod suppliers;
pub mod tenant;
pub mod transactions;

use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// State shared by all handlers
#[derive(Clone)]
pub struct ApiState {
    /// Connection pool
    pub database: Arc<DatabaseConnection>,
}

impl ApiState {
    /// Wraps a connection for sharing across handlers
    #[must_use]
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            database: Arc::new(database),
        }
    }
}

/// Builds the service router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/trending", get(products::trending_product))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/suppliers",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route(
            "/suppliers/{id}",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .delete(suppliers::delete_supplier),
        )
        .route("/transactions", get(transactions::list_transactions))
        .route("/reports/daily-sales", get(transactions::daily_sales))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{errors::Result, test_utils::*};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        admin_id: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(admin_id) = admin_id {
            request = request.header(tenant::ADMIN_HEADER, admin_id.to_string());
        }
        let body = match body {
            Some(body) => {
                request = request.header("content-type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn setup_app() -> Result<(Router, i64)> {
        let (db, admin) = setup_with_admin().await?;
        Ok((router(ApiState::new(db)), admin.id))
    }

    #[tokio::test]
    async fn test_requests_without_tenant_are_unauthorized() -> Result<()> {
        let (app, _) = setup_app().await?;

        let (status, body) = send(&app, Method::GET, "/products", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authorized");

        let (status, _) = send(&app, Method::GET, "/products", Some(999), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn test_product_lifecycle() -> Result<()> {
        let (app, admin) = setup_app().await?;

        let (status, body) = send(
            &app,
            Method::POST,
            "/suppliers",
            Some(admin),
            Some(json!({ "name": "Acme", "contactInfo": "acme@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Supplier created successfully");
        let supplier_id = body["supplier"]["id"].as_i64().unwrap_or_default();

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(admin),
            Some(json!({
                "name": "Linen Shirt",
                "category": "Shirts",
                "price": 25.0,
                "stockQuantity": 10,
                "supplier": supplier_id,
                "transactionType": "purchase",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Product created successfully");
        assert_eq!(body["product"]["stockQuantity"], 10);
        let product_id = body["product"]["id"].as_i64().unwrap_or_default();

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(admin),
            Some(json!({
                "name": "Linen Shirt",
                "price": 25.0,
                "stockQuantity": 4,
                "supplier": supplier_id,
                "transactionType": "sale",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Product updated successfully");
        assert_eq!(body["product"]["stockQuantity"], 6);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/products/{product_id}"),
            Some(admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Linen Shirt");
        assert_eq!(body["supplier"]["name"], "Acme");

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/suppliers/{supplier_id}"),
            Some(admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["productsSupplied"][0]["id"], product_id);
        assert_eq!(body["totalTransactions"], 350.0);

        let (status, body) =
            send(&app, Method::GET, "/products/trending", Some(admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["id"], product_id);
        assert_eq!(body["product"]["totalQuantitySold"], 14);

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/products/{product_id}"),
            Some(admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product deleted successfully");

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("/suppliers/{supplier_id}"),
            Some(admin),
            None,
        )
        .await;
        assert_eq!(body["productsSupplied"], json!([]));
        assert_eq!(body["totalTransactions"], 0.0);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/products/{product_id}"),
            Some(admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");

        let (_, body) = send(&app, Method::GET, "/transactions", Some(admin), None).await;
        assert_eq!(body, json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_sale_on_new_product_is_rejected() -> Result<()> {
        let (app, admin) = setup_app().await?;

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(admin),
            Some(json!({
                "name": "Ghost",
                "price": 5.0,
                "stockQuantity": 1,
                "transactionType": "sale",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Cannot create a new product with a sale transaction"
        );

        let (_, body) = send(&app, Method::GET, "/products", Some(admin), None).await;
        assert_eq!(body, json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_by_id_rejects_mismatched_type() -> Result<()> {
        let (app, admin) = setup_app().await?;

        let (_, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(admin),
            Some(json!({
                "name": "Mug",
                "price": 8.0,
                "stockQuantity": 5,
                "transactionType": "purchase",
            })),
        )
        .await;
        let product_id = body["product"]["id"].as_i64().unwrap_or_default();

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/products/{product_id}"),
            Some(admin),
            Some(json!({
                "name": "Mug",
                "price": 8.0,
                "stockQuantity": 9,
                "transactionType": "sale",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/products/{product_id}"),
            Some(admin),
            Some(json!({
                "name": "Mug",
                "price": 8.0,
                "stockQuantity": 2,
                "transactionType": "sale",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["stockQuantity"], 2);

        let (_, body) = send(
            &app,
            Method::GET,
            "/transactions?sort=date&type=sale",
            Some(admin),
            None,
        )
        .await;
        assert_eq!(body[0]["quantity"], 3);
        assert_eq!(body[0]["transactionType"], "sale");
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_requests_get_json_errors() -> Result<()> {
        let (app, admin) = setup_app().await?;

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(admin),
            Some(json!({
                "name": "Mug",
                "price": "10",
                "stockQuantity": 1,
                "transactionType": "purchase",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

        let (status, body) =
            send(&app, Method::GET, "/products/abc", Some(admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (status, body) = send(
            &app,
            Method::GET,
            "/transactions?product=abc",
            Some(admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (_, body) = send(&app, Method::GET, "/products", Some(admin), None).await;
        assert_eq!(body, json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_trending_without_transactions_is_not_found() -> Result<()> {
        let (app, admin) = setup_app().await?;

        let (status, body) =
            send(&app, Method::GET, "/products/trending", Some(admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No trending product found");
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_sort_is_bad_request() -> Result<()> {
        let (app, admin) = setup_app().await?;

        let (status, _) = send(
            &app,
            Method::GET,
            "/transactions?sort=price",
            Some(admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_supplier_endpoints() -> Result<()> {
        let (app, admin) = setup_app().await?;

        let (_, body) = send(
            &app,
            Method::POST,
            "/suppliers",
            Some(admin),
            Some(json!({ "name": "Acme" })),
        )
        .await;
        let supplier_id = body["supplier"]["id"].as_i64().unwrap_or_default();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/suppliers/{supplier_id}"),
            Some(admin),
            Some(json!({ "address": "1 Main St" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["supplier"]["name"], "Acme");
        assert_eq!(body["supplier"]["address"], "1 Main St");

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(admin),
            Some(json!({
                "name": "Kettle",
                "price": 30.0,
                "stockQuantity": 1,
                "supplier": supplier_id + 100,
                "transactionType": "purchase",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Supplier not found");

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/suppliers/{supplier_id}"),
            Some(admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/suppliers/{supplier_id}"),
            Some(admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Supplier not found");
        Ok(())
    }
}
