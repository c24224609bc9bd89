use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::calendar::{iso_date, parse_iso_date};

#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FrequencyPeriod {
    #[default]
    Weekly,
    Monthly,
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    pub fn weekday(self) -> Weekday {
        match self {
            DayOfWeek::Mon => Weekday::Mon,
            DayOfWeek::Tue => Weekday::Tue,
            DayOfWeek::Wed => Weekday::Wed,
            DayOfWeek::Thu => Weekday::Thu,
            DayOfWeek::Fri => Weekday::Fri,
            DayOfWeek::Sat => Weekday::Sat,
            DayOfWeek::Sun => Weekday::Sun,
        }
    }

    /// Monday through Friday, the selection new custom habits start with.
    pub fn weekdays() -> Vec<DayOfWeek> {
        vec![
            DayOfWeek::Mon,
            DayOfWeek::Tue,
            DayOfWeek::Wed,
            DayOfWeek::Thu,
            DayOfWeek::Fri,
        ]
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => DayOfWeek::Mon,
            Weekday::Tue => DayOfWeek::Tue,
            Weekday::Wed => DayOfWeek::Wed,
            Weekday::Thu => DayOfWeek::Thu,
            Weekday::Fri => DayOfWeek::Fri,
            Weekday::Sat => DayOfWeek::Sat,
            Weekday::Sun => DayOfWeek::Sun,
        }
    }
}

/// Sparse per-day completion record keyed by `YYYY-MM-DD`.
///
/// A missing key and a `false` value both mean "not completed". Keys that
/// are not canonical dates are kept for round-tripping but never counted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct History(BTreeMap<String, bool>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<bool> {
        self.0.get(&iso_date(date)).copied()
    }

    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.get(date).unwrap_or(false)
    }

    pub fn set(&mut self, date: NaiveDate, completed: bool) {
        self.0.insert(iso_date(date), completed);
    }

    /// Flips the entry for `date` and returns the new value. Absent entries
    /// become `true`.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        let entry = self.0.entry(iso_date(date)).or_insert(false);
        *entry = !*entry;
        *entry
    }

    /// Every entry with a well-formed date key, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, bool)> + '_ {
        self.0
            .iter()
            .filter_map(|(key, value)| parse_iso_date(key).map(|date| (date, *value)))
    }

    /// Completed days, oldest first.
    pub fn completed_dates(&self) -> Vec<NaiveDate> {
        self.entries()
            .filter_map(|(date, completed)| completed.then_some(date))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn raw(&self) -> &BTreeMap<String, bool> {
        &self.0
    }
}

impl From<BTreeMap<String, bool>> for History {
    fn from(value: BTreeMap<String, bool>) -> Self {
        Self(value)
    }
}

impl FromIterator<(NaiveDate, bool)> for History {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, bool)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(date, completed)| (iso_date(date), completed))
                .collect(),
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_period: Option<FrequencyPeriod>,
    #[serde(default)]
    pub selected_days: Vec<DayOfWeek>,
    #[serde(default)]
    pub reminder_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub history: History,
}

impl Habit {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        frequency: Frequency,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            frequency,
            frequency_count: None,
            frequency_period: None,
            selected_days: Vec::new(),
            reminder_enabled: false,
            reminder_time: None,
            created_at,
            history: History::new(),
        }
    }

    /// Calendar day the habit was created on, seen from `offset`.
    pub fn created_on(&self, offset: FixedOffset) -> NaiveDate {
        self.created_at.with_timezone(&offset).date_naive()
    }
}
