//! Product record and its projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orchard_core::{Price, ProductId};

/// A product in the catalog.
///
/// The JSON wire form uses camelCase field names (`isFeatured`,
/// `createdAt`) to match the public API surface consumed by the
/// storefront frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Non-negative price in the shop currency.
    pub price: Price,
    /// Image host URL; empty string when the product has no image.
    pub image: String,
    pub category: String,
    /// Whether the product appears in the featured set.
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product carries an image reference.
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// Fields for creating a product.
///
/// The image is the final image host URL (already uploaded), or an
/// empty string when the product has none. New products are never
/// featured; featuring happens through the toggle mutation.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: String,
    pub category: String,
}

/// Projection returned by the recommendations endpoint.
///
/// Only the fields the storefront renders on a recommendation card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Price,
}
