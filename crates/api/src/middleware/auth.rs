//! Admin authentication extractor.
//!
//! Mutating catalog routes are gated behind a single admin bearer
//! token. Full user accounts, sessions, and roles live in an external
//! identity service; this extractor only guards the admin surface of
//! this binary.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires the admin bearer token.
///
/// Rejects with a 401 JSON body when the `Authorization` header is
/// missing, malformed, or carries the wrong token.
///
/// # Example
///
/// ```rust,ignore
/// async fn admin_handler(
///     _admin: RequireAdmin,
///     State(state): State<AppState>,
/// ) -> Result<Json<ProductsResponse>> {
///     // only reached with a valid token
/// }
/// ```
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        if token != state.config().admin_token.expose_secret() {
            return Err(AppError::Unauthorized);
        }

        Ok(Self)
    }
}
