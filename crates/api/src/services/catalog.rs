//! Catalog service: store access plus featured-cache choreography.
//!
//! The featured list is served cache-aside: reads consult the cache
//! first and repopulate it from the store on a miss. Mutations that can
//! change featured-set membership (the toggle, and deletes) update the
//! store first, then unconditionally recompute and overwrite the cache
//! snapshot. The design always repopulates rather than clearing, so the
//! cache is never observably empty after first population unless the
//! store itself is empty.
//!
//! Concurrent misses may each query the store and each refresh; that
//! race is benign because every writer computes from the same source of
//! truth, so last-writer-wins is correct.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{instrument, warn};

use orchard_core::{Price, PriceError, ProductId};

use crate::cache::{CacheError, FeaturedCache, FeaturedSnapshot};
use crate::db::{CatalogStore, RepositoryError};
use crate::models::{NewProduct, Product, RecommendedProduct};
use crate::services::images::{ImageHost, ImageHostError, public_id_from_url};

/// How many products the recommendations endpoint samples.
const RECOMMENDATION_SAMPLE_SIZE: u32 = 3;

/// Errors from catalog operations.
///
/// Callers can tell a missing id apart from transient infrastructure
/// failure instead of collapsing everything into one server error.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with the requested id.
    #[error("product not found")]
    NotFound,

    /// Input failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] PriceError),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] RepositoryError),

    /// The featured cache failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The image host failed during an upload.
    #[error(transparent)]
    ImageHost(#[from] ImageHostError),
}

/// Fields accepted when creating a product.
///
/// `image` carries the raw image payload (data URI) to upload, not a
/// URL; the service stores whatever URL the image host returns, or an
/// empty string when no image was sent.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: String,
}

/// Catalog operations over an injected store, cache, and image host.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    cache: Arc<dyn FeaturedCache>,
    images: Arc<dyn ImageHost>,
    image_folder: String,
}

impl CatalogService {
    /// Create a service over its three collaborators.
    ///
    /// `image_folder` is the image host preset folder, used when
    /// deriving public ids for cleanup.
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache: Arc<dyn FeaturedCache>,
        images: Arc<dyn ImageHost>,
        image_folder: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cache,
            images,
            image_folder: image_folder.into(),
        }
    }

    /// Every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the store query fails.
    pub async fn all(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list_all().await?)
    }

    /// Products in a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the store query fails.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list_by_category(category).await?)
    }

    /// A random sample of products for the recommendations widget.
    ///
    /// Returns fewer than the sample size when the catalog is small,
    /// never an error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the store query fails.
    pub async fn recommendations(&self) -> Result<Vec<RecommendedProduct>, CatalogError> {
        Ok(self.store.sample_random(RECOMMENDATION_SAMPLE_SIZE).await?)
    }

    /// The featured set, cache-aside.
    ///
    /// On a miss the snapshot is recomputed from the store and written
    /// back before returning, including when the store's featured list
    /// is empty: an empty snapshot is a populated entry, not a miss.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if recomputation fails and
    /// `CatalogError::Cache` if the cache cannot be read or written.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Result<FeaturedSnapshot, CatalogError> {
        if let Some(snapshot) = self.cache.read().await? {
            return Ok(snapshot);
        }

        let products = self.store.list_featured().await?;
        self.cache.refresh(products.clone()).await?;
        Ok(Arc::new(products))
    }

    /// Flip a product's featured flag, then refresh the cache.
    ///
    /// The store mutation lands first; the snapshot rewrite follows
    /// unconditionally and is never skipped. A refresh failure is
    /// reported (the store mutation is not rolled back).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id,
    /// `CatalogError::Store` or `CatalogError::Cache` on infrastructure
    /// failure.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn toggle_featured(&self, id: ProductId) -> Result<Product, CatalogError> {
        let current = self.store.get(id).await?.ok_or(CatalogError::NotFound)?;

        let updated = self
            .store
            .set_featured(id, !current.is_featured)
            .await?
            .ok_or(CatalogError::NotFound)?;

        self.refresh_featured().await?;
        Ok(updated)
    }

    /// Create a product, uploading its image first when one is given.
    ///
    /// An upload failure fails the whole create; a product without an
    /// image stores an empty string. New products are never featured,
    /// so the cache needs no refresh here.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for a negative price,
    /// `CatalogError::ImageHost` if the upload fails, and
    /// `CatalogError::Store` if the insert fails.
    #[instrument(skip(self, fields), fields(name = %fields.name))]
    pub async fn create(&self, fields: CreateProduct) -> Result<Product, CatalogError> {
        let price = Price::new(fields.price)?;

        let image = match fields.image.as_deref().filter(|data| !data.is_empty()) {
            Some(data) => self.images.upload(data).await?.secure_url,
            None => String::new(),
        };

        let product = self
            .store
            .create(NewProduct {
                name: fields.name,
                description: fields.description,
                price,
                image,
                category: fields.category,
            })
            .await?;

        Ok(product)
    }

    /// Delete a product, cleaning up its hosted image best-effort.
    ///
    /// An image host failure is logged and swallowed; it never blocks
    /// the store delete. Deleting a featured product changes
    /// featured-set membership, so the snapshot is refreshed afterward.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id,
    /// `CatalogError::Store` or `CatalogError::Cache` on infrastructure
    /// failure.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let product = self.store.get(id).await?.ok_or(CatalogError::NotFound)?;

        if product.has_image() {
            match public_id_from_url(&product.image, &self.image_folder) {
                Some(public_id) => {
                    if let Err(e) = self.images.destroy(&public_id).await {
                        warn!(error = %e, %public_id, "failed to delete image from host");
                    }
                }
                None => warn!(image = %product.image, "could not derive image public id"),
            }
        }

        self.store.delete(id).await?;
        self.refresh_featured().await?;
        Ok(())
    }

    /// Recompute the featured snapshot from the store and overwrite the
    /// cache entry.
    async fn refresh_featured(&self) -> Result<(), CatalogError> {
        let products = self.store.list_featured().await?;
        self.cache.refresh(products).await?;
        Ok(())
    }
}
