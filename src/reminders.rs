use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Timelike};
use habitrack_core::{
    Clock,
    reminder::{due_reminders, reminder_message},
};
use habitrack_habit::HabitStore;

/// Periodically matches reminder times against the clock.
///
/// Each wall-clock minute is scanned at most once, however short the
/// interval. Delivery is a log record.
pub struct ReminderWorker {
    store: Arc<dyn HabitStore>,
    clock: Arc<dyn Clock>,
    last_minute: Option<(NaiveDate, u32, u32)>,
}

impl ReminderWorker {
    pub fn new(store: Arc<dyn HabitStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            last_minute: None,
        }
    }

    /// Scans the current minute, returning the reminder messages it fired.
    pub async fn tick(&mut self) -> habitrack_shared::Result<Vec<String>> {
        let now = self.clock.now();
        let minute = (now.date_naive(), now.hour(), now.minute());

        if self.last_minute == Some(minute) {
            return Ok(Vec::new());
        }

        let habits = self.store.load_all().await?;
        self.last_minute = Some(minute);

        let messages = due_reminders(&habits, now.time())
            .into_iter()
            .map(|habit| {
                let message = reminder_message(habit);
                tracing::info!(
                    habit_id = %habit.id,
                    reminder_time = habit.reminder_time.as_deref().unwrap_or_default(),
                    "{}",
                    message
                );
                message
            })
            .collect();

        Ok(messages)
    }

    pub async fn run(mut self, every: Duration) {
        tracing::info!(interval_secs = every.as_secs(), "Reminder worker started");

        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;

            if let Err(err) = self.tick().await {
                tracing::error!(error = %err, "Reminder scan failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use habitrack_core::{FixedClock, Frequency, Habit};
    use habitrack_habit::MemoryStore;

    fn at(value: &str) -> Arc<dyn Clock> {
        let now: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(value).unwrap();
        Arc::new(FixedClock::new(now))
    }

    fn habits() -> Vec<Habit> {
        let created_at = "2024-01-01T00:00:00Z".parse().unwrap();

        let mut water = Habit::new("h1", "Drink water", Frequency::Daily, created_at);
        water.reminder_enabled = true;
        water.reminder_time = Some("08:00".to_string());

        let mut read = Habit::new("h2", "Read", Frequency::Daily, created_at);
        read.reminder_enabled = false;
        read.reminder_time = Some("08:00".to_string());

        vec![water, read]
    }

    #[tokio::test]
    async fn fires_enabled_reminders_once_per_minute() {
        let store: Arc<dyn HabitStore> = Arc::new(MemoryStore::with_habits(habits()));
        let mut worker = ReminderWorker::new(store, at("2024-01-05T08:00:30+02:00"));

        let first = worker.tick().await.unwrap();
        assert_eq!(first, vec!["Time to complete your habit: Drink water".to_string()]);

        let again = worker.tick().await.unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn other_minutes_are_quiet() {
        let store: Arc<dyn HabitStore> = Arc::new(MemoryStore::with_habits(habits()));
        let mut worker = ReminderWorker::new(store, at("2024-01-05T08:01:00+02:00"));

        assert!(worker.tick().await.unwrap().is_empty());
    }
}
