use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::calendar::add_days;
use crate::percentage;
use crate::types::{Frequency, Habit, History};

const DAY_MS: i64 = 86_400_000;

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub current_streak: u32,
    pub best_streak: u32,
    pub completion_rate: u32,
}

/// Streaks and completion rate of one habit as of `now`.
///
/// Completions dated before the habit's creation day are not counted.
pub fn compute_stats(habit: &Habit, now: DateTime<FixedOffset>) -> HabitStats {
    let today = now.date_naive();
    let created_on = habit.created_on(*now.offset());
    let completed: Vec<NaiveDate> = habit
        .history
        .completed_dates()
        .into_iter()
        .filter(|date| *date >= created_on)
        .collect();

    HabitStats {
        current_streak: current_streak(&habit.history, today, created_on),
        best_streak: best_streak(&completed),
        completion_rate: completion_rate(
            completed.len(),
            habit.created_at,
            now.with_timezone(&Utc),
        ),
    }
}

/// Consecutive completed days ending today, or ending yesterday when today
/// is still open. The walk never goes past `created_on`.
pub fn current_streak(history: &History, today: NaiveDate, created_on: NaiveDate) -> u32 {
    let start = if history.is_completed(today) {
        today
    } else {
        add_days(today, -1)
    };

    let mut streak = 0;
    let mut day = start;

    while day >= created_on && history.is_completed(day) {
        streak += 1;

        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    streak
}

/// Longest run of consecutive calendar days in `dates`, which must be
/// ascending and free of duplicates.
pub fn best_streak(dates: &[NaiveDate]) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        run = match previous {
            Some(previous) if (*date - previous).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(*date);
    }

    best
}

/// `round(100 * completed / days)` where `days` counts started 24h periods
/// since creation, at least one. Not clamped to 100.
pub fn completion_rate(completed: usize, created_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let elapsed = (now - created_at).num_milliseconds().max(0);
    let days = ((elapsed + DAY_MS - 1) / DAY_MS).max(1);

    percentage(completed, days as usize)
}

/// Highest best streak over `habits`, zero for an empty list.
pub fn best_streak_across(habits: &[Habit], now: DateTime<FixedOffset>) -> u32 {
    habits
        .iter()
        .map(|habit| compute_stats(habit, now).best_streak)
        .max()
        .unwrap_or(0)
}

pub fn streak_text(streak: u32) -> String {
    match streak {
        0 => "No streak".to_owned(),
        1 => "1 day streak".to_owned(),
        n => format!("{n} day streak"),
    }
}

/// Up to `limit` completed days between creation and today, newest first.
pub fn recent_completions(
    habit: &Habit,
    now: DateTime<FixedOffset>,
    limit: usize,
) -> Vec<NaiveDate> {
    let today = now.date_naive();
    let created_on = habit.created_on(*now.offset());

    habit
        .history
        .completed_dates()
        .into_iter()
        .rev()
        .filter(|date| (created_on..=today).contains(date))
        .take(limit)
        .collect()
}

/// Short human description of how often a habit repeats.
pub fn frequency_text(habit: &Habit) -> String {
    match habit.frequency {
        Frequency::Daily => "Daily".to_owned(),
        Frequency::Weekly => "Weekly".to_owned(),
        Frequency::Custom => format!(
            "{}x {}",
            habit.frequency_count.unwrap_or(1),
            habit.frequency_period.unwrap_or_default()
        ),
    }
}
