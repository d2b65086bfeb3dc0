//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded at
//! compile time. The API binary never runs them on startup; this
//! command is the only migration path.

use tracing::info;

use super::{CommandError, connect};

/// Run catalog database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    info!("Connecting to catalog database...");
    let pool = connect().await?;

    info!("Running catalog migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    info!("Catalog migrations complete!");
    Ok(())
}
