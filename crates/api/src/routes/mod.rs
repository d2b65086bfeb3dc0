//! HTTP route handlers.

pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the application router (everything except health checks).
pub fn routes() -> Router<AppState> {
    Router::new().merge(products::router())
}
