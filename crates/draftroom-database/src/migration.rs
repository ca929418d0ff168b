//! Embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use draftroom_core::error::{AppError, ErrorKind};
use draftroom_core::result::AppResult;

/// Migrations compiled in from the workspace `migrations/` directory.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema up to date, applying any migrations not yet recorded.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!(
        known = MIGRATOR.iter().count(),
        "Applying schema migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
    })?;

    info!("Schema is up to date");
    Ok(())
}
