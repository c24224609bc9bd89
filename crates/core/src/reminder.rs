use chrono::NaiveTime;

use crate::types::Habit;

/// Habits whose reminder is enabled for the wall-clock minute `now`.
pub fn due_reminders(habits: &[Habit], now: NaiveTime) -> Vec<&Habit> {
    let current = now.format("%H:%M").to_string();

    habits
        .iter()
        .filter(|habit| {
            habit.reminder_enabled && habit.reminder_time.as_deref() == Some(current.as_str())
        })
        .collect()
}

pub fn reminder_message(habit: &Habit) -> String {
    format!("Time to complete your habit: {}", habit.title)
}
