use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use habitrack_core::Habit;
use habitrack_shared::Result;
use tokio::sync::RwLock;

use crate::memory::HabitList;
use crate::store::completions_in;
use crate::{Completion, DateRange, HabitInput, HabitPatch, HabitStore};

/// Keeps every habit in one JSON array on disk.
///
/// The file is read once when the store opens. Every change rewrites it
/// through a temporary sibling so a crash never leaves half a file behind.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    habits: RwLock<HabitList>,
}

impl LocalStore {
    /// Opens `path`, starting empty when the file is missing or corrupt.
    ///
    /// Any other read failure is returned, so the store never saves over a
    /// file it could not load.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if tokio::fs::metadata(&path).await.is_ok_and(|meta| meta.is_dir()) {
            habitrack_shared::bail!("{} is a directory, not a habit file", path.display());
        }

        let habits = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<Habit>>(&bytes) {
                Ok(habits) => habits,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Habit file is corrupt, starting with an empty list"
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(path = %path.display(), habits = habits.len(), "Opened local habit store");

        Ok(Self {
            path,
            habits: RwLock::new(HabitList(habits)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, habits: &HabitList) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&habits.0)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }

    async fn mutate<T>(&self, change: impl FnOnce(&mut HabitList) -> Result<T>) -> Result<T> {
        let mut habits = self.habits.write().await;
        let mut next = habits.clone();
        let value = change(&mut next)?;

        self.save(&next).await?;
        *habits = next;

        Ok(value)
    }
}

#[async_trait::async_trait]
impl HabitStore for LocalStore {
    async fn load_all(&self) -> Result<Vec<Habit>> {
        Ok(self.habits.read().await.0.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Habit>> {
        Ok(self.habits.read().await.find(id).cloned())
    }

    async fn create(&self, input: HabitInput, created_at: DateTime<Utc>) -> Result<Habit> {
        self.mutate(|habits| habits.create(input, created_at)).await
    }

    async fn update(&self, id: &str, patch: HabitPatch) -> Result<Option<Habit>> {
        self.mutate(|habits| habits.update(id, patch)).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.mutate(|habits| Ok(habits.delete(id))).await
    }

    async fn toggle_completion(&self, id: &str, date: NaiveDate) -> Result<Option<bool>> {
        self.mutate(|habits| Ok(habits.toggle(id, date))).await
    }

    async fn completions(&self, id: &str, range: DateRange) -> Result<Option<Vec<Completion>>> {
        Ok(self
            .habits
            .read()
            .await
            .find(id)
            .map(|habit| completions_in(habit, range)))
    }
}
