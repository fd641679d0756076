//! Schema migration runner.

use tracing::info;

use gymhub_core::error::{AppError, ErrorKind};

use crate::connection::DatabasePool;

/// Apply pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(db: &DatabasePool) -> Result<(), AppError> {
    info!("Applying document store migrations");

    sqlx::migrate!("../../migrations")
        .run(db.pool())
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Document store schema is up to date");
    Ok(())
}
