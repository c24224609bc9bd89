//! Heat-map style completion buckets over a trailing window.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::calendar::{
    add_days, days_between, end_of_month, start_of_month, start_of_week, sub_months,
};
use crate::percentage;
use crate::schedule::is_due;
use crate::types::{Frequency, Habit};

#[derive(
    EnumString,
    Display,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Buckets in a window when no length is given: 30 days, 12 weeks or
    /// 12 months.
    pub fn default_length(self) -> u32 {
        match self {
            Granularity::Day => 30,
            Granularity::Week | Granularity::Month => 12,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(from = "RawWindowSpec")]
pub struct WindowSpec {
    pub granularity: Granularity,
    pub length: u32,
    /// Only habits with this frequency are counted when set.
    pub frequency: Option<Frequency>,
}

#[derive(Deserialize)]
struct RawWindowSpec {
    #[serde(default)]
    granularity: Granularity,
    length: Option<u32>,
    #[serde(default)]
    frequency: Option<Frequency>,
}

impl From<RawWindowSpec> for WindowSpec {
    fn from(raw: RawWindowSpec) -> Self {
        Self {
            granularity: raw.granularity,
            length: raw.length.unwrap_or(raw.granularity.default_length()),
            frequency: raw.frequency,
        }
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self::new(Granularity::default())
    }
}

impl WindowSpec {
    /// A window of `granularity` buckets with its default length.
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            length: granularity.default_length(),
            frequency: None,
        }
    }

    pub fn days(length: u32) -> Self {
        Self {
            granularity: Granularity::Day,
            length,
            frequency: None,
        }
    }

    pub fn weeks(length: u32) -> Self {
        Self {
            granularity: Granularity::Week,
            length,
            frequency: None,
        }
    }

    pub fn months(length: u32) -> Self {
        Self {
            granularity: Granularity::Month,
            length,
            frequency: None,
        }
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub due: usize,
    pub completed: usize,
    pub percentage: u32,
    pub level: u8,
    pub tooltip: String,
    pub contains_today: bool,
}

/// Quantizes a completion percentage into heat-map levels 0 through 5.
pub fn intensity(percentage: u32) -> u8 {
    match percentage {
        0 => 0,
        1..25 => 1,
        25..50 => 2,
        50..75 => 3,
        75..100 => 4,
        _ => 5,
    }
}

pub fn tooltip(label: &str, percentage: u32) -> String {
    match percentage {
        0 => format!("{label}: No habits completed"),
        100.. => format!("{label}: All habits completed"),
        n => format!("{label}: {n}% completed"),
    }
}

fn label(granularity: Granularity, start: NaiveDate) -> String {
    match granularity {
        Granularity::Day => start.format("%b %-d, %Y").to_string(),
        Granularity::Week => start.format("Week of %b %-d, %Y").to_string(),
        Granularity::Month => start.format("%B %Y").to_string(),
    }
}

fn bucket_range(granularity: Granularity, today: NaiveDate, back: u32) -> (NaiveDate, NaiveDate) {
    match granularity {
        Granularity::Day => {
            let day = add_days(today, -i64::from(back));
            (day, day)
        }
        Granularity::Week => {
            let start = add_days(start_of_week(today), -7 * i64::from(back));
            (start, add_days(start, 6))
        }
        Granularity::Month => {
            let start = sub_months(start_of_month(today), back);
            (start, end_of_month(start))
        }
    }
}

/// Buckets for the trailing window ending in the bucket that contains
/// today, oldest first.
///
/// Each bucket counts the (habit, day) pairs that were due on its elapsed
/// days and how many of those were completed.
pub fn contribution_buckets(
    habits: &[Habit],
    window: WindowSpec,
    now: DateTime<FixedOffset>,
) -> Vec<Bucket> {
    let today = now.date_naive();
    let offset = *now.offset();
    let habits: Vec<&Habit> = habits
        .iter()
        .filter(|habit| window.frequency.is_none_or(|f| habit.frequency == f))
        .collect();

    (0..window.length)
        .rev()
        .map(|back| {
            let (start, end) = bucket_range(window.granularity, today, back);

            let (due, completed) = days_between(start, end.min(today))
                .flat_map(|day| habits.iter().map(move |habit| (habit, day)))
                .filter(|(habit, day)| is_due(habit, *day, offset))
                .fold((0, 0), |(due, completed), (habit, day)| {
                    (
                        due + 1,
                        completed + usize::from(habit.history.is_completed(day)),
                    )
                });

            let percentage = percentage(completed, due);

            Bucket {
                start,
                end,
                due,
                completed,
                percentage,
                level: intensity(percentage),
                tooltip: tooltip(&label(window.granularity, start), percentage),
                contains_today: start <= today && today <= end,
            }
        })
        .collect()
}
