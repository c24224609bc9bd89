use std::{path::PathBuf, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use habitrack_core::{Frequency, parse_iso_date};
use habitrack_habit::{DateRange, HabitInput, HabitPatch, HabitStore, SqliteStore};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use sqlx_migrator::migrator::{Migrate, Plan};

pub async fn setup_sqlite_store(path: PathBuf) -> anyhow::Result<SqliteStore> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    habitrack_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    Ok(SqliteStore::new(pool.clone(), pool))
}

/// WAL database with a read-only pool and a single-connection writer.
#[allow(dead_code)]
pub async fn setup_split_sqlite_store(path: PathBuf) -> anyhow::Result<SqliteStore> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let write = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts.clone().create_if_missing(true))
        .await?;
    let mut conn = write.acquire().await?;
    habitrack_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let read = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(opts.read_only(true))
        .await?;

    Ok(SqliteStore::new(read, write))
}

pub fn date(value: &str) -> NaiveDate {
    parse_iso_date(value).unwrap()
}

pub fn created_at() -> DateTime<Utc> {
    "2024-01-01T09:30:00Z".parse().unwrap()
}

/// Behaviour every store must share.
#[allow(dead_code)]
pub async fn exercise_store(store: &dyn HabitStore) -> anyhow::Result<()> {
    assert!(store.load_all().await?.is_empty());

    let read = store
        .create(HabitInput::new("Read", Frequency::Daily), created_at())
        .await?;
    let mut gym = HabitInput::new("Gym", Frequency::Custom);
    gym.frequency_count = Some(3);
    let gym = store.create(gym, created_at()).await?;

    assert_eq!(read.id.len(), 26);
    assert_ne!(read.id, gym.id);
    assert_eq!(store.load_all().await?.len(), 2);

    let found = store.find(&read.id).await?.unwrap();
    assert_eq!(found.title, "Read");
    assert_eq!(found.created_at, created_at());
    assert!(store.find("missing").await?.is_none());
    assert_eq!(store.get(&read.id).await?.id, read.id);
    assert!(store.get("missing").await.unwrap_err().is_not_found());

    // toggle flips and a second toggle restores
    assert_eq!(
        store.toggle_completion(&read.id, date("2024-01-02")).await?,
        Some(true)
    );
    assert_eq!(
        store.toggle_completion(&read.id, date("2024-01-03")).await?,
        Some(true)
    );
    assert_eq!(
        store.toggle_completion(&read.id, date("2024-01-03")).await?,
        Some(false)
    );
    assert_eq!(
        store.toggle_completion("missing", date("2024-01-03")).await?,
        None
    );

    let habit = store.find(&read.id).await?.unwrap();
    assert!(habit.history.is_completed(date("2024-01-02")));
    assert!(!habit.history.is_completed(date("2024-01-03")));
    assert_eq!(habit.history.len(), 2);

    let completions = store
        .completions(
            &read.id,
            DateRange::new(Some(date("2024-01-03")), None),
        )
        .await?
        .unwrap();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].date, date("2024-01-03"));
    assert!(!completions[0].completed);
    assert!(
        store
            .completions("missing", DateRange::default())
            .await?
            .is_none()
    );

    let updated = store
        .update(
            &read.id,
            HabitPatch {
                title: Some("Read 20 pages".to_owned()),
                ..Default::default()
            },
        )
        .await?
        .unwrap();
    assert_eq!(updated.title, "Read 20 pages");
    assert_eq!(updated.history, habit.history);
    assert!(
        store
            .update("missing", HabitPatch::default())
            .await?
            .is_none()
    );

    let invalid = store
        .update(
            &read.id,
            HabitPatch {
                title: Some(String::new()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(invalid, Err(habitrack_shared::Error::Validate(_))));

    assert!(store.delete(&read.id).await?);
    assert!(!store.delete(&read.id).await?);
    assert!(store.find(&read.id).await?.is_none());
    assert_eq!(store.load_all().await?.len(), 1);

    Ok(())
}
