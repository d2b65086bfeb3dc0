//! Database operations for the catalog `PostgreSQL`.
//!
//! ## Tables
//!
//! - `products` - The authoritative product catalog
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p orchard-cli -- migrate
//! ```
//! They are never run automatically on startup.

pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use orchard_core::ProductId;

use crate::models::{NewProduct, Product, RecommendedProduct};

pub use products::PgCatalogStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx (connectivity or query failure).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// The authoritative persistent record set for products.
///
/// Implemented by [`PgCatalogStore`] in production and by in-memory
/// fakes in tests. Absence is modelled with `Option`/`bool` rather than
/// an error variant so callers decide what "not found" means.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a product and return the stored record.
    async fn create(&self, fields: NewProduct) -> Result<Product, RepositoryError>;

    /// Point lookup by id.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Delete by id. Returns `false` when no row existed.
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Every product in the catalog.
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Products in the given category.
    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError>;

    /// Up to `n` products picked at random, projected to the
    /// recommendation card fields. Never fails on a small catalog.
    async fn sample_random(&self, n: u32) -> Result<Vec<RecommendedProduct>, RepositoryError>;

    /// Products with `is_featured = true`.
    async fn list_featured(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Set the featured flag. Returns the updated record, or `None`
    /// when the id does not exist.
    async fn set_featured(
        &self,
        id: ProductId,
        featured: bool,
    ) -> Result<Option<Product>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
