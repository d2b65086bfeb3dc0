//! Featured-products cache.
//!
//! A derived, read-optimized copy of the `is_featured = true` set,
//! stored under a single well-known key with no expiry. The cache is an
//! injected dependency (trait object) rather than a module-level
//! singleton, so tests can substitute an in-memory fake.
//!
//! The original backend this replaces wrote the snapshot under
//! `featuredProducts` on reads and `featured_products` on invalidation,
//! so toggles never refreshed what reads consulted. There is exactly
//! one key here; see DESIGN.md.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use thiserror::Error;

use crate::models::Product;

/// The single canonical cache key for the featured snapshot.
pub const FEATURED_PRODUCTS_KEY: &str = "featured_products";

/// Errors that can occur talking to the cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Cache backend unavailable or rejected the operation.
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// A snapshot of the featured set.
///
/// `Arc` so concurrent readers share one allocation; the snapshot is
/// immutable once written.
pub type FeaturedSnapshot = Arc<Vec<Product>>;

/// Read/refresh contract for the featured-products cache.
///
/// `read` distinguishes a populated-but-empty snapshot (`Some` with an
/// empty vec) from "never loaded" (`None`); callers must not collapse
/// the two.
#[async_trait]
pub trait FeaturedCache: Send + Sync {
    /// The cached snapshot, if one has been written.
    async fn read(&self) -> Result<Option<FeaturedSnapshot>, CacheError>;

    /// Unconditionally overwrite the snapshot.
    async fn refresh(&self, products: Vec<Product>) -> Result<(), CacheError>;
}

/// In-process featured cache backed by `moka`.
///
/// No TTL: the snapshot only changes when a mutation refreshes it, and
/// the refresh path is never skipped.
#[derive(Clone)]
pub struct MokaFeaturedCache {
    cache: Cache<&'static str, FeaturedSnapshot>,
}

impl MokaFeaturedCache {
    #[must_use]
    pub fn new() -> Self {
        // One logical entry; capacity is only a formality.
        let cache = Cache::builder().max_capacity(1).build();
        Self { cache }
    }
}

impl Default for MokaFeaturedCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeaturedCache for MokaFeaturedCache {
    async fn read(&self) -> Result<Option<FeaturedSnapshot>, CacheError> {
        Ok(self.cache.get(FEATURED_PRODUCTS_KEY).await)
    }

    async fn refresh(&self, products: Vec<Product>) -> Result<(), CacheError> {
        self.cache
            .insert(FEATURED_PRODUCTS_KEY, Arc::new(products))
            .await;
        Ok(())
    }
}
