use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use habitrack_core::{DayOfWeek, Frequency, FrequencyPeriod, Habit, History};
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

static RE_REMINDER_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap());

pub const DEFAULT_REMINDER_TIME: &str = "08:00";

/// Titles must keep at least one visible character once trimmed.
fn validate_title(title: &str) -> Result<(), validator::ValidationError> {
    if title.trim().is_empty() {
        return Err(validator::ValidationError::new("title_blank")
            .with_message("Title must not be blank".into()));
    }

    Ok(())
}

#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HabitInput {
    #[validate(length(min = 1, max = 100), custom(function = "validate_title"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    #[validate(range(min = 1, max = 99))]
    pub frequency_count: Option<u32>,
    #[serde(default)]
    pub frequency_period: Option<FrequencyPeriod>,
    #[serde(default)]
    pub selected_days: Option<Vec<DayOfWeek>>,
    #[serde(default)]
    pub reminder_enabled: bool,
    #[serde(default)]
    #[validate(regex(path = *RE_REMINDER_TIME, message = "Reminder time must be HH:MM"))]
    pub reminder_time: Option<String>,
}

impl HabitInput {
    pub fn new(title: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            title: title.into(),
            frequency,
            ..Default::default()
        }
    }

    /// Builds the stored record, filling the defaults a new habit starts with.
    pub fn into_habit(self, id: String, created_at: DateTime<Utc>) -> Habit {
        let custom = self.frequency == Frequency::Custom;

        Habit {
            id,
            title: self.title.trim().to_owned(),
            description: self.description.filter(|d| !d.is_empty()),
            frequency: self.frequency,
            frequency_count: self.frequency_count.or(custom.then_some(1)),
            frequency_period: self
                .frequency_period
                .or(custom.then_some(FrequencyPeriod::Weekly)),
            selected_days: self.selected_days.unwrap_or_else(DayOfWeek::weekdays),
            reminder_enabled: self.reminder_enabled,
            reminder_time: self.reminder_time.or_else(|| {
                self.reminder_enabled
                    .then(|| DEFAULT_REMINDER_TIME.to_owned())
            }),
            created_at,
            history: History::new(),
        }
    }
}

/// Partial update. `id`, `createdAt` and `history` are never touched.
#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HabitPatch {
    #[validate(length(min = 1, max = 100), custom(function = "validate_title"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    #[validate(range(min = 1, max = 99))]
    pub frequency_count: Option<u32>,
    pub frequency_period: Option<FrequencyPeriod>,
    pub selected_days: Option<Vec<DayOfWeek>>,
    pub reminder_enabled: Option<bool>,
    #[validate(regex(path = *RE_REMINDER_TIME, message = "Reminder time must be HH:MM"))]
    pub reminder_time: Option<String>,
}

impl HabitPatch {
    pub fn apply(self, habit: &mut Habit) {
        if let Some(title) = self.title {
            habit.title = title.trim().to_owned();
        }

        if let Some(description) = self.description {
            habit.description = (!description.is_empty()).then_some(description);
        }

        if let Some(frequency) = self.frequency {
            habit.frequency = frequency;
        }

        if let Some(count) = self.frequency_count {
            habit.frequency_count = Some(count);
        }

        if let Some(period) = self.frequency_period {
            habit.frequency_period = Some(period);
        }

        if let Some(days) = self.selected_days {
            habit.selected_days = days;
        }

        if let Some(enabled) = self.reminder_enabled {
            habit.reminder_enabled = enabled;
        }

        if let Some(time) = self.reminder_time {
            habit.reminder_time = Some(time);
        }
    }
}
