//! Business logic services.

pub mod catalog;
pub mod images;

pub use catalog::{CatalogError, CatalogService, CreateProduct};
pub use images::{ImageHost, ImageHostClient, ImageHostError, UploadedImage};
