use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tasklane_core::AppError;
use tracing::info;

pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    let migrator = sqlx::migrate!("../../crates/infrastructure/migrations");
    migrator
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;
    info!(
        migrations = migrator.iter().count(),
        max_connections, "database ready"
    );

    Ok(pool)
}
