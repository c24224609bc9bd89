use chrono::{DateTime, NaiveDate, Utc};
use habitrack_core::Habit;
use habitrack_shared::Result;
use tokio::sync::RwLock;
use validator::Validate;

use crate::store::{completions_in, new_id};
use crate::{Completion, DateRange, HabitInput, HabitPatch, HabitStore};

/// Ordered habit list shared by the in-process stores.
#[derive(Debug, Default, Clone)]
pub(crate) struct HabitList(pub(crate) Vec<Habit>);

impl HabitList {
    pub(crate) fn find(&self, id: &str) -> Option<&Habit> {
        self.0.iter().find(|habit| habit.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Habit> {
        self.0.iter_mut().find(|habit| habit.id == id)
    }

    pub(crate) fn create(&mut self, input: HabitInput, created_at: DateTime<Utc>) -> Result<Habit> {
        input.validate()?;

        let habit = input.into_habit(new_id(), created_at);
        self.0.push(habit.clone());

        Ok(habit)
    }

    pub(crate) fn update(&mut self, id: &str, patch: HabitPatch) -> Result<Option<Habit>> {
        patch.validate()?;

        let Some(habit) = self.find_mut(id) else {
            return Ok(None);
        };

        patch.apply(habit);

        Ok(Some(habit.clone()))
    }

    pub(crate) fn delete(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|habit| habit.id != id);

        self.0.len() != before
    }

    pub(crate) fn toggle(&mut self, id: &str, date: NaiveDate) -> Option<bool> {
        self.find_mut(id).map(|habit| habit.history.toggle(date))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    habits: RwLock<HabitList>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_habits(habits: Vec<Habit>) -> Self {
        Self {
            habits: RwLock::new(HabitList(habits)),
        }
    }
}

#[async_trait::async_trait]
impl HabitStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<Habit>> {
        Ok(self.habits.read().await.0.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Habit>> {
        Ok(self.habits.read().await.find(id).cloned())
    }

    async fn create(&self, input: HabitInput, created_at: DateTime<Utc>) -> Result<Habit> {
        self.habits.write().await.create(input, created_at)
    }

    async fn update(&self, id: &str, patch: HabitPatch) -> Result<Option<Habit>> {
        self.habits.write().await.update(id, patch)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.habits.write().await.delete(id))
    }

    async fn toggle_completion(&self, id: &str, date: NaiveDate) -> Result<Option<bool>> {
        Ok(self.habits.write().await.toggle(id, date))
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
