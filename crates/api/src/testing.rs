//! Shared in-memory fakes for unit tests.
//!
//! The store, cache, and image host are trait objects, so tests swap in
//! these fakes instead of standing up Postgres or an image host.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::DateTime;
use rand::seq::IteratorRandom;
use rust_decimal::Decimal;

use orchard_core::{Price, ProductId};

use crate::db::{CatalogStore, RepositoryError};
use crate::models::{NewProduct, Product, RecommendedProduct};
use crate::services::images::{ImageHost, ImageHostError, UploadedImage};

/// A product with fixed timestamps for assertions.
pub fn product(id: i32, featured: bool) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: "desc".to_string(),
        price: Price::new(Decimal::new(1000, 2)).unwrap(),
        image: String::new(),
        category: "misc".to_string(),
        is_featured: featured,
        created_at: DateTime::UNIX_EPOCH,
        updated_at: DateTime::UNIX_EPOCH,
    }
}

/// In-memory catalog store keyed by id.
#[derive(Default)]
pub struct InMemoryStore {
    products: Mutex<BTreeMap<i32, Product>>,
    next_id: AtomicUsize,
    featured_queries: AtomicUsize,
}

impl InMemoryStore {
    pub fn with_products(products: Vec<Product>) -> Self {
        let store = Self::default();
        let max_id = products.iter().map(|p| p.id.as_i32()).max().unwrap_or(0);
        store
            .next_id
            .store(usize::try_from(max_id).unwrap(), Ordering::SeqCst);
        *store.products.lock().unwrap() =
            products.into_iter().map(|p| (p.id.as_i32(), p)).collect();
        store
    }

    /// How many times `list_featured` has hit this store.
    pub fn featured_query_count(&self) -> usize {
        self.featured_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn create(&self, fields: NewProduct) -> Result<Product, RepositoryError> {
        let id = i32::try_from(self.next_id.fetch_add(1, Ordering::SeqCst) + 1).unwrap();
        let product = Product {
            id: ProductId::new(id),
            name: fields.name,
            description: fields.description,
            price: fields.price,
            image: fields.image,
            category: fields.category,
            is_featured: false,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        };
        self.products.lock().unwrap().insert(id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.lock().unwrap().get(&id.as_i32()).cloned())
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        Ok(self.products.lock().unwrap().remove(&id.as_i32()).is_some())
    }

    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.lock().unwrap().values().cloned().collect())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    async fn sample_random(&self, n: u32) -> Result<Vec<RecommendedProduct>, RepositoryError> {
        let mut rng = rand::rng();
        Ok(self
            .products
            .lock()
            .unwrap()
            .values()
            .map(|p| RecommendedProduct {
                id: p.id,
                name: p.name.clone(),
                description: p.description.clone(),
                image: p.image.clone(),
                price: p.price,
            })
            .choose_multiple(&mut rng, usize::try_from(n).unwrap()))
    }

    async fn list_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        self.featured_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.is_featured)
            .cloned()
            .collect())
    }

    async fn set_featured(
        &self,
        id: ProductId,
        featured: bool,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut products = self.products.lock().unwrap();
        Ok(products.get_mut(&id.as_i32()).map(|p| {
            p.is_featured = featured;
            p.clone()
        }))
    }
}

/// Image host fake that records calls and can fail on demand.
#[derive(Default)]
pub struct RecordingImageHost {
    pub uploads: Mutex<Vec<String>>,
    pub destroys: Mutex<Vec<String>>,
    pub fail_destroy: bool,
}

#[async_trait]
impl ImageHost for RecordingImageHost {
    async fn upload(&self, data: &str) -> Result<UploadedImage, ImageHostError> {
        self.uploads.lock().unwrap().push(data.to_string());
        Ok(UploadedImage {
            secure_url: "https://img.example.com/v1/products/uploaded42.png".to_string(),
            public_id: "products/uploaded42".to_string(),
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError> {
        self.destroys.lock().unwrap().push(public_id.to_string());
        if self.fail_destroy {
            return Err(ImageHostError::Api {
                status: 502,
                message: "host is down".to_string(),
            });
        }
        Ok(())
    }
}
