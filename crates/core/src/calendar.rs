//! Date arithmetic on local calendar days.
//!
//! Weeks start on Monday. Every function here is total: arithmetic that
//! would leave chrono's representable range saturates instead of failing.

use chrono::{Datelike, Months, NaiveDate, TimeDelta, Weekday};
use serde::Serialize;

use crate::types::History;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parses a strict `YYYY-MM-DD` string. Anything else yields `None`.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let digits = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 4 && *i != 7)
        .all(|(_, b)| b.is_ascii_digit());

    if !digits {
        return None;
    }

    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).ok()
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    parse_iso_date(&format!("{value}-01"))
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// ISO weekday number, Monday = 1 through Sunday = 7.
pub fn weekday(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    add_days(date, -i64::from(date.weekday().num_days_from_monday()))
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };

    let next = first
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);

    (next - first).num_days() as u32
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = start_of_month(date);
    add_days(first, i64::from(days_in_month(date.year(), date.month())) - 1)
}

/// Inclusive range of days, empty when `end < start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// The Monday-to-Sunday week containing `date`.
pub fn week_days(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = start_of_week(date);
    std::array::from_fn(|i| add_days(monday, i as i64))
}

pub fn short_weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    /// Raw history entry, `None` when the day was never marked.
    pub is_completed: Option<bool>,
    pub is_today: bool,
}

/// One entry per day of the month starting at `month`.
pub fn month_calendar(history: &History, month: NaiveDate, today: NaiveDate) -> Vec<CalendarDay> {
    let first = start_of_month(month);

    days_between(first, end_of_month(first))
        .map(|date| CalendarDay {
            date,
            day: date.day(),
            is_completed: history.get(date),
            is_today: date == today,
        })
        .collect()
}
