//! Image host API client.
//!
//! Products store a plain URL; hosting and transformation live in an
//! external service with a small upload/destroy API. Uploads happen
//! before the product row is written (a failed upload fails the
//! create); deletes are best-effort cleanup driven by the catalog
//! service.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ImageHostConfig;

/// Errors that can occur when interacting with the image host.
#[derive(Debug, Error)]
pub enum ImageHostError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response or build the request.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A stored image as reported by the host after upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    /// Canonical HTTPS URL, stored on the product row.
    pub secure_url: String,
    /// Host-side identifier used for deletion.
    pub public_id: String,
}

/// Upload/destroy contract against the image host.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload image data (a data URI or base64 payload) into the
    /// configured preset folder.
    async fn upload(&self, data: &str) -> Result<UploadedImage, ImageHostError>;

    /// Delete a previously uploaded image by its public id.
    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError>;
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file: &'a str,
    upload_preset: &'a str,
}

#[derive(Debug, Serialize)]
struct DestroyRequest<'a> {
    public_id: &'a str,
}

/// HTTP client for the image host API.
#[derive(Clone)]
pub struct ImageHostClient {
    client: reqwest::Client,
    base_url: String,
    upload_preset: String,
}

impl ImageHostClient {
    /// Create a new image host client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ImageHostConfig) -> Result<Self, ImageHostError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ImageHostError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            upload_preset: config.upload_preset.clone(),
        })
    }
}

#[async_trait]
impl ImageHost for ImageHostClient {
    async fn upload(&self, data: &str) -> Result<UploadedImage, ImageHostError> {
        let url = format!("{}/image/upload", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&UploadRequest {
                file: data,
                upload_preset: &self.upload_preset,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageHostError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ImageHostError::Parse(e.to_string()))
    }

    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError> {
        let url = format!("{}/image/destroy", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&DestroyRequest { public_id })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageHostError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Derive the host-side public id from a stored image URL.
///
/// The host keys images as `<folder>/<basename-without-extension>`,
/// where the folder is the upload preset. Returns `None` for URLs with
/// no usable final path segment.
#[must_use]
pub fn public_id_from_url(url: &str, folder: &str) -> Option<String> {
    let basename = url.rsplit('/').next()?;
    let stem = basename.split('.').next()?;
    if stem.is_empty() {
        return None;
    }
    Some(format!("{folder}/{stem}"))
}
