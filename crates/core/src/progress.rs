use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::calendar::{short_weekday_name, week_days};
use crate::percentage;
use crate::schedule::is_due;
use crate::types::Habit;

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DailyProgress {
    pub total: usize,
    pub completed: usize,
    pub percentage: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayProgress {
    pub date: NaiveDate,
    pub short_name: &'static str,
    /// `None` for days after today.
    pub completion: Option<u32>,
    pub is_future: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WeeklyProgress {
    pub days: Vec<DayProgress>,
    pub percentage: u32,
}

/// Share of habits due on `date` that were completed on it.
pub fn daily_progress(habits: &[Habit], date: NaiveDate, offset: FixedOffset) -> DailyProgress {
    let (total, completed) = habits
        .iter()
        .filter(|habit| is_due(habit, date, offset))
        .fold((0, 0), |(total, completed), habit| {
            (
                total + 1,
                completed + usize::from(habit.history.is_completed(date)),
            )
        });

    DailyProgress {
        total,
        completed,
        percentage: percentage(completed, total),
    }
}

/// Daily percentages for the Monday-to-Sunday week containing today.
///
/// The week percentage averages the non-future days only.
pub fn weekly_progress(habits: &[Habit], now: DateTime<FixedOffset>) -> WeeklyProgress {
    let today = now.date_naive();
    let offset = *now.offset();

    let days: Vec<DayProgress> = week_days(today)
        .into_iter()
        .map(|date| {
            let is_future = date > today;
            DayProgress {
                date,
                short_name: short_weekday_name(date),
                completion: (!is_future).then(|| daily_progress(habits, date, offset).percentage),
                is_future,
            }
        })
        .collect();

    let elapsed: Vec<u32> = days.iter().filter_map(|day| day.completion).collect();
    let percentage = match elapsed.len() {
        0 => 0,
        n => (f64::from(elapsed.iter().sum::<u32>()) / n as f64).round() as u32,
    };

    WeeklyProgress { days, percentage }
}
