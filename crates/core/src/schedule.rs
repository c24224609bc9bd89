use chrono::{Datelike, FixedOffset, NaiveDate};

use crate::types::{DayOfWeek, Frequency, Habit};

/// Whether `habit` is expected to be completed on `date`.
///
/// Nothing is due before the day the habit was created. Daily and weekly
/// habits are due every day after that; custom habits only on their
/// selected weekdays. Progress and contribution views both go through
/// this function so they always agree.
pub fn is_due(habit: &Habit, date: NaiveDate, offset: FixedOffset) -> bool {
    if date < habit.created_on(offset) {
        return false;
    }

    match habit.frequency {
        Frequency::Daily | Frequency::Weekly => true,
        Frequency::Custom => habit
            .selected_days
            .contains(&DayOfWeek::from(date.weekday())),
    }
}

/// Habits due on `date`, in input order.
pub fn due_on(habits: &[Habit], date: NaiveDate, offset: FixedOffset) -> Vec<&Habit> {
    habits
        .iter()
        .filter(|habit| is_due(habit, date, offset))
        .collect()
}
