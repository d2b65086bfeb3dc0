//! Product store backed by `PostgreSQL`.
//!
//! Queries use the runtime `query_as` API with [`sqlx::FromRow`] rows
//! so the crate builds without a live database.

use async_trait::async_trait;
use sqlx::PgPool;

use orchard_core::ProductId;

use super::{CatalogStore, RepositoryError};
use crate::models::{NewProduct, Product, RecommendedProduct};

/// Columns selected for a full [`Product`] row.
const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image, category, is_featured, created_at, updated_at";

/// `PostgreSQL`-backed catalog store.
///
/// Cheaply cloneable; `PgPool` is reference-counted internally.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn create(&self, fields: NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products (name, description, price, image, category) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.price)
            .bind(&fields.image)
            .bind(&fields.category)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id");

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn sample_random(&self, n: u32) -> Result<Vec<RecommendedProduct>, RepositoryError> {
        // Postgres equivalent of a `$sample` aggregation: fine at
        // catalog scale, revisit if the table grows past ~100k rows.
        let products = sqlx::query_as::<_, RecommendedProduct>(
            "SELECT id, name, description, image, price FROM products \
             ORDER BY random() LIMIT $1",
        )
        .bind(i64::from(n))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn list_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE is_featured ORDER BY id");

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn set_featured(
        &self,
        id: ProductId,
        featured: bool,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "UPDATE products SET is_featured = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(featured)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }
}
