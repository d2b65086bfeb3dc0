//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors
//! to Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cache::CacheError;
use crate::db::RepositoryError;
use crate::services::catalog::CatalogError;
use crate::services::images::ImageHostError;

/// Application-level error type for the catalog API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the client.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid admin credentials.
    #[error("Unauthorized")]
    Unauthorized,

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),

    /// Featured cache operation failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Image host operation failed.
    #[error("Image host error: {0}")]
    ImageHost(#[from] ImageHostError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => Self::NotFound("Product not found".to_string()),
            CatalogError::Validation(e) => Self::Validation(e.to_string()),
            CatalogError::Store(e) => Self::Store(e),
            CatalogError::Cache(e) => Self::Cache(e),
            CatalogError::ImageHost(e) => Self::ImageHost(e),
        }
    }
}

/// JSON failure body: `{ "message": ..., "error": ... }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    error: &'static str,
}

impl AppError {
    /// Short machine-readable kind for the `error` field.
    const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Unauthorized => "unauthorized",
            Self::Store(_) => "store_error",
            Self::Cache(_) => "cache_error",
            Self::ImageHost(_) => "image_host_error",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Store(_) | Self::Cache(_) | Self::ImageHost(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ImageHost(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Cache(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(_) | Self::Cache(_) | Self::Internal(_) => "Server error".to_string(),
            Self::ImageHost(_) => "Image host error".to_string(),
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::NotFound(msg) => msg.clone(),
            Self::Validation(msg) => msg.clone(),
        };

        let body = ErrorBody {
            message,
            error: self.kind(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found");

        let err = AppError::Validation("price must be non-negative, got -1".to_string());
        assert!(err.to_string().starts_with("Validation error"));
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::Cache(CacheError::Unavailable("down".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::ImageHost(ImageHostError::Api {
                status: 500,
                message: "boom".to_string(),
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_catalog_not_found_maps_to_404() {
        let err: AppError = CatalogError::NotFound.into();
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Internal("secret connection string".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
