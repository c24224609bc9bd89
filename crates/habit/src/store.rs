use chrono::{DateTime, NaiveDate, Utc};
use habitrack_core::Habit;
use habitrack_shared::Result;
use serde::Serialize;

use crate::{HabitInput, HabitPatch};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Inclusive date bounds, either side open.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}

/// Persistence for habit records and their completion history.
///
/// Lookups by an unknown id return `None`/`false` rather than an error.
#[async_trait::async_trait]
pub trait HabitStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Habit>>;

    async fn find(&self, id: &str) -> Result<Option<Habit>>;

    /// Like [`HabitStore::find`] but an unknown id is an `Error::NotFound`.
    async fn get(&self, id: &str) -> Result<Habit> {
        let Some(habit) = self.find(id).await? else {
            habitrack_shared::not_found!("habit {id} not found");
        };

        Ok(habit)
    }

    async fn create(&self, input: HabitInput, created_at: DateTime<Utc>) -> Result<Habit>;

    async fn update(&self, id: &str, patch: HabitPatch) -> Result<Option<Habit>>;

    async fn delete(&self, id: &str) -> Result<bool>;

    /// Flips the completion flag of `date` and returns the new value.
    async fn toggle_completion(&self, id: &str, date: NaiveDate) -> Result<Option<bool>>;

    async fn completions(&self, id: &str, range: DateRange) -> Result<Option<Vec<Completion>>>;
}

pub(crate) fn completions_in(habit: &Habit, range: DateRange) -> Vec<Completion> {
    habit
        .history
        .entries()
        .filter(|(date, _)| range.contains(*date))
        .map(|(date, completed)| Completion { date, completed })
        .collect()
}

pub(crate) fn new_id() -> String {
    ulid::Ulid::new().to_string()
}
