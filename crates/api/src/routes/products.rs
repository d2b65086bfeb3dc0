//! Product catalog routes.
//!
//! | Method | Path | Auth |
//! |---|---|---|
//! | GET | /products | admin |
//! | GET | /products/featured | none |
//! | GET | /products/category/{category} | none |
//! | GET | /products/recommendations | none |
//! | POST | /products | admin |
//! | PATCH | /products | admin |
//! | DELETE | /products/{id} | admin |

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orchard_core::ProductId;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{Product, RecommendedProduct};
use crate::services::CreateProduct;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(list_all).post(create).patch(toggle_featured),
        )
        .route("/products/featured", get(featured))
        .route("/products/category/{category}", get(by_category))
        .route("/products/recommendations", get(recommendations))
        .route("/products/{id}", delete(delete_product))
}

/// Response envelope for product lists.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// Request body for creating a product.
///
/// `image` is the raw image payload (data URI) to upload, not a URL.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
}

/// Request body for the featured toggle.
#[derive(Debug, Deserialize)]
pub struct ToggleFeaturedRequest {
    pub id: ProductId,
}

/// Response body for a successful delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// List the whole catalog (admin).
async fn list_all(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>> {
    let products = state.catalog().all().await?;
    Ok(Json(ProductsResponse { products }))
}

/// The featured set, served cache-aside.
async fn featured(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let snapshot = state.catalog().featured().await?;
    Ok(Json(ProductsResponse {
        products: snapshot.as_ref().clone(),
    }))
}

/// Products in a category.
async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ProductsResponse>> {
    let products = state.catalog().by_category(&category).await?;
    Ok(Json(ProductsResponse { products }))
}

/// A random sample of products, projected fields only. Bare array.
async fn recommendations(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecommendedProduct>>> {
    let products = state.catalog().recommendations().await?;
    Ok(Json(products))
}

/// Create a product (admin), uploading its image first when present.
async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state
        .catalog()
        .create(CreateProduct {
            name: body.name,
            description: body.description,
            price: body.price,
            image: body.image,
            category: body.category,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Toggle a product's featured flag (admin); refreshes the cache.
async fn toggle_featured(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ToggleFeaturedRequest>,
) -> Result<Json<Product>> {
    let product = state.catalog().toggle_featured(body.id).await?;
    Ok(Json(product))
}

/// Delete a product (admin), with best-effort image cleanup.
async fn delete_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    state.catalog().delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Product deleted successfully",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, header};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::cache::MokaFeaturedCache;
    use crate::config::{ApiConfig, ImageHostConfig};
    use crate::services::CatalogService;
    use crate::testing::{InMemoryStore, RecordingImageHost, product};

    const ADMIN_TOKEN: &str = "kQ9mXvL7pR2tY5wZ8cF1dG4hJ6nVbT3a";

    fn test_config() -> ApiConfig {
        ApiConfig {
            database_url: SecretString::from("postgres://localhost/orchard_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            admin_token: SecretString::from(ADMIN_TOKEN),
            image_host: ImageHostConfig {
                base_url: "https://img.example.com".to_string(),
                api_key: SecretString::from("k".repeat(32)),
                upload_preset: "products".to_string(),
            },
            sentry_dsn: None,
        }
    }

    /// App over in-memory collaborators. The pool is lazy and never
    /// actually connects; no handler under test touches it.
    fn test_app(store: Arc<InMemoryStore>) -> Router {
        let catalog = CatalogService::new(
            store,
            Arc::new(MokaFeaturedCache::new()),
            Arc::new(RecordingImageHost::default()),
            "products",
        );
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/orchard_test")
            .unwrap();
        let state = AppState::new(test_config(), pool, catalog);

        crate::routes::routes().with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn admin_request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"));
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_featured_returns_products_envelope() {
        let store = Arc::new(InMemoryStore::with_products(vec![
            product(1, true),
            product(2, false),
        ]));
        let app = test_app(store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/products/featured")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let products = json["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["id"], 1);
        assert_eq!(products[0]["isFeatured"], true);
    }

    #[tokio::test]
    async fn test_list_all_requires_admin_token() {
        let app = test_app(Arc::new(InMemoryStore::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/products")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_list_all_with_admin_token() {
        let store = Arc::new(InMemoryStore::with_products(vec![product(1, false)]));
        let app = test_app(store);

        let response = app
            .oneshot(admin_request("GET", "/products", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["products"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_category_filter_is_public() {
        let mut kitchen = product(1, false);
        kitchen.category = "kitchen".to_string();
        let store = Arc::new(InMemoryStore::with_products(vec![
            kitchen,
            product(2, false),
        ]));
        let app = test_app(store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/products/category/kitchen")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["products"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recommendations_is_a_bare_array() {
        let store = Arc::new(InMemoryStore::with_products(vec![
            product(1, false),
            product(2, false),
        ]));
        let app = test_app(store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/products/recommendations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let sample = json.as_array().unwrap();
        assert_eq!(sample.len(), 2);
        // Projection only: no featured flag on recommendation cards.
        assert!(sample[0].get("isFeatured").is_none());
    }

    #[tokio::test]
    async fn test_create_returns_201_with_product() {
        let app = test_app(Arc::new(InMemoryStore::default()));

        let response = app
            .oneshot(admin_request(
                "POST",
                "/products",
                Some(serde_json::json!({
                    "name": "Mug",
                    "description": "A mug.",
                    "price": "12.99",
                    "category": "kitchen",
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["name"], "Mug");
        assert_eq!(json["image"], "");
        assert_eq!(json["isFeatured"], false);
    }

    #[tokio::test]
    async fn test_toggle_flips_flag_and_updates_featured() {
        let store = Arc::new(InMemoryStore::with_products(vec![product(1, false)]));
        let app = test_app(store);

        // Warm the cache first so the toggle must refresh it.
        let warm = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/products/featured")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(body_json(warm).await["products"].as_array().unwrap().is_empty());

        let response = app
            .clone()
            .oneshot(admin_request(
                "PATCH",
                "/products",
                Some(serde_json::json!({ "id": 1 })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["isFeatured"], true);

        let after = app
            .oneshot(
                Request::builder()
                    .uri("/products/featured")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(after).await;
        assert_eq!(json["products"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_product_is_404() {
        let app = test_app(Arc::new(InMemoryStore::default()));

        let response = app
            .oneshot(admin_request("DELETE", "/products/99", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Product not found");
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_delete_returns_message() {
        let store = Arc::new(InMemoryStore::with_products(vec![product(1, false)]));
        let app = test_app(store);

        let response = app
            .oneshot(admin_request("DELETE", "/products/1", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Product deleted successfully");
    }
}
