use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::log::LevelFilter;

/// Connection options shared by every habitrack pool.
///
/// The API reads habits from many connections while toggles and edits go
/// through one writer. WAL lets those readers keep their snapshot while the
/// writer commits, and the busy timeout covers the CLI touching the same
/// file as a running server. `foreign_keys` must be on for completions to
/// follow their habit on delete. The options apply to every connection the
/// pool opens, not only the first.
fn connect_options(database_url: &str) -> Result<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .pragma("cache_size", "-20000")
        .pragma("temp_store", "memory")
        .log_statements(LevelFilter::Debug);

    Ok(options)
}

/// Read-only pool serving `load_all`, `find` and completion queries.
pub async fn create_read_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = connect_options(database_url)?.read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(max_connections, "Created read-only habit pool");

    Ok(pool)
}

/// Single-connection pool for every habit write.
///
/// One writer means a toggle's existence check and upsert never race
/// another writer for the lock. Creates the database file when it does
/// not exist yet.
pub async fn create_write_pool(database_url: &str) -> Result<SqlitePool> {
    let options = connect_options(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    tracing::info!("Created habit write pool");

    Ok(pool)
}

/// Read-write pool used by `migrate` and `reset`.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = connect_options(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(max_connections, "Created habit pool");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_applies_pragmas() {
        let pool = create_pool(":memory:", 1).await.unwrap();

        let journal_mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(journal_mode.0, "memory"); // WAL doesn't apply to :memory:

        let foreign_keys: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(foreign_keys.0, 1);

        let temp_store: (i32,) = sqlx::query_as("PRAGMA temp_store")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(temp_store.0, 2);
    }

    #[tokio::test]
    async fn test_every_read_connection_gets_pragmas() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("habitrack.db");
        let url = format!("sqlite:{}", path.display());

        let _write = create_write_pool(&url).await.unwrap();
        let read = create_read_pool(&url, 2).await.unwrap();

        let mut first = read.acquire().await.unwrap();
        let mut second = read.acquire().await.unwrap();

        for conn in [&mut first, &mut second] {
            let (journal_mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
                .fetch_one(&mut **conn)
                .await
                .unwrap();
            assert_eq!(journal_mode, "wal");

            let (foreign_keys,): (i32,) = sqlx::query_as("PRAGMA foreign_keys")
                .fetch_one(&mut **conn)
                .await
                .unwrap();
            assert_eq!(foreign_keys, 1);
        }
    }

    #[tokio::test]
    async fn test_write_pool_creates_database_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("habitrack.db");
        let url = format!("sqlite:{}", path.display());

        let _write = create_write_pool(&url).await.unwrap();
        let read = create_read_pool(&url, 2).await.unwrap();

        assert!(path.exists());
        let (one,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(&read).await.unwrap();
        assert_eq!(one, 1);
    }
}
