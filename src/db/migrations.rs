use sqlx::{Pool, Postgres};
use tracing::info;

/// Apply the embedded migrations under `migrations/`
///
/// Already-applied migrations are skipped, so this runs on every start.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}
