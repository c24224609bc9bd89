use std::sync::Arc;

use anyhow::Result;
use habitrack_habit::{HabitStore, LocalStore, SqliteStore};
use sqlx::SqlitePool;
use sqlx_migrator::migrator::{Migrate, Plan};

use crate::config::{Config, StoreBackend};

/// Opens the habit store selected by `store.backend`.
///
/// The SQLite backend applies pending migrations before the read pool opens.
pub async fn open_store(config: &Config) -> Result<Arc<dyn HabitStore>> {
    match config.store.backend {
        StoreBackend::Sqlite => {
            let write_pool = crate::db::create_write_pool(&config.database.url).await?;
            run_migrations(&write_pool).await?;

            let read_pool =
                crate::db::create_read_pool(&config.database.url, config.database.max_connections)
                    .await?;

            tracing::info!(url = %config.database.url, "Using SQLite habit store");

            Ok(Arc::new(SqliteStore::new(read_pool, write_pool)))
        }
        StoreBackend::Local => {
            let store = LocalStore::open(&config.store.local_path).await?;

            tracing::info!(path = %store.path().display(), "Using local habit file");

            Ok(Arc::new(store))
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let mut conn = pool.acquire().await?;
    habitrack_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    Ok(())
}
