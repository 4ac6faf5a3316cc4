use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::bootstrap::config::Config;

pub use sqlx::postgres::PgPool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn connect_pool(cfg: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.database_max_connections)
        .acquire_timeout(cfg.database_acquire_timeout)
        .connect(&cfg.database_url)
        .await?;
    tracing::info!(
        max_connections = cfg.database_max_connections,
        "database_pool_ready"
    );
    Ok(pool)
}

/// Applies the schema migrations embedded from ./migrations.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    tracing::info!(known = MIGRATOR.iter().count(), "database_migrated");
    Ok(())
}

pub mod repositories;
