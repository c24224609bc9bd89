pub mod calendar;
pub mod clock;
pub mod contribution;
pub mod progress;
pub mod reminder;
pub mod schedule;
pub mod stats;

mod types;

pub use calendar::{CalendarDay, iso_date, parse_iso_date};
pub use clock::{Clock, FixedClock, SystemClock};
pub use contribution::{Bucket, Granularity, WindowSpec, contribution_buckets};
pub use progress::{DailyProgress, DayProgress, WeeklyProgress, daily_progress, weekly_progress};
pub use schedule::is_due;
pub use stats::{HabitStats, compute_stats};
pub use types::*;

/// `round(100 * part / whole)`, zero when `whole` is zero.
pub(crate) fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }

    (part as f64 / whole as f64 * 100.0).round() as u32
}
