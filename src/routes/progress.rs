use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, FixedOffset};
use habitrack_core::{
    Bucket, DailyProgress, Frequency, Granularity, Habit, WeeklyProgress, WindowSpec,
    contribution_buckets, daily_progress, parse_iso_date, stats::best_streak_across,
    weekly_progress,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::routes::{AppState, TodayQuery};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_habits: usize,
    pub today: DailyProgress,
    pub best_streak: u32,
    pub weekly_percentage: u32,
}

impl Dashboard {
    pub fn build(habits: &[Habit], now: DateTime<FixedOffset>) -> Self {
        Self {
            total_habits: habits.len(),
            today: daily_progress(habits, now.date_naive(), *now.offset()),
            best_streak: best_streak_across(habits, now),
            weekly_percentage: weekly_progress(habits, now).percentage,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct DailyQuery {
    pub date: Option<String>,
    pub today: Option<String>,
}

#[derive(Deserialize, Validate, Debug, Default)]
pub struct ContributionQuery {
    pub granularity: Option<Granularity>,
    #[validate(range(max = 1000))]
    pub length: Option<u32>,
    pub frequency: Option<Frequency>,
    pub today: Option<String>,
}

impl ContributionQuery {
    fn window(&self) -> WindowSpec {
        let mut window = WindowSpec::new(self.granularity.unwrap_or_default());

        if let Some(length) = self.length {
            window.length = length;
        }

        window.frequency = self.frequency;
        window
    }
}

/// GET /api/progress/daily?date=
#[tracing::instrument(skip(state, query))]
pub async fn get_daily_progress(
    State(state): State<AppState>,
    query: Result<Query<DailyQuery>, QueryRejection>,
) -> Result<Json<DailyProgress>, AppError> {
    let Query(query) = query?;
    let now = state.now(query.today.as_deref())?;
    let date = match query.date.as_deref() {
        Some(date) => parse_iso_date(date)
            .ok_or_else(|| AppError::bad_request(format!("Invalid date: {date}")))?,
        None => now.date_naive(),
    };

    let habits = state.store.load_all().await?;

    Ok(Json(daily_progress(&habits, date, *now.offset())))
}

/// GET /api/progress/weekly
#[tracing::instrument(skip(state, query))]
pub async fn get_weekly_progress(
    State(state): State<AppState>,
    query: Result<Query<TodayQuery>, QueryRejection>,
) -> Result<Json<WeeklyProgress>, AppError> {
    let Query(query) = query?;
    let now = state.now(query.today.as_deref())?;
    let habits = state.store.load_all().await?;

    Ok(Json(weekly_progress(&habits, now)))
}

/// GET /api/progress/contribution?granularity=&length=&frequency=
#[tracing::instrument(skip(state, query))]
pub async fn get_contribution(
    State(state): State<AppState>,
    query: Result<Query<ContributionQuery>, QueryRejection>,
) -> Result<Json<Vec<Bucket>>, AppError> {
    let Query(query) = query?;
    query.validate().map_err(habitrack_shared::Error::from)?;

    let now = state.now(query.today.as_deref())?;
    let habits = state.store.load_all().await?;

    Ok(Json(contribution_buckets(&habits, query.window(), now)))
}

/// GET /api/dashboard
#[tracing::instrument(skip(state, query))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    query: Result<Query<TodayQuery>, QueryRejection>,
) -> Result<Json<Dashboard>, AppError> {
    let Query(query) = query?;
    let now = state.now(query.today.as_deref())?;
    let habits = state.store.load_all().await?;

    Ok(Json(Dashboard::build(&habits, now)))
}
