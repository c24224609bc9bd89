use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use habitrack_core::{
    CalendarDay, Habit, HabitStats, calendar, compute_stats,
    stats::{frequency_text, recent_completions, streak_text},
};
use habitrack_habit::{Completion, DateRange, HabitInput, HabitPatch};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::routes::{AppState, TodayQuery};

/// Days of completions embedded in the habit detail.
const DETAIL_DAYS: i64 = 30;
const RECENT_COMPLETIONS: usize = 5;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HabitDetail {
    #[serde(flatten)]
    pub habit: Habit,
    pub completions: Vec<Completion>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: HabitStats,
    pub streak_text: String,
    pub frequency_text: String,
    pub recent_completions: Vec<NaiveDate>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompletionsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CalendarQuery {
    /// `YYYY-MM`, the current month when absent.
    pub month: Option<String>,
    pub today: Option<String>,
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    calendar::parse_iso_date(value)
        .ok_or_else(|| AppError::bad_request(format!("Invalid date: {value}")))
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value.map(parse_date).transpose()
}

/// GET /api/habits - all habits, newest first
#[tracing::instrument(skip(state))]
pub async fn list_habits(State(state): State<AppState>) -> Result<Json<Vec<Habit>>, AppError> {
    let mut habits = state.store.load_all().await?;
    habits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

    Ok(Json(habits))
}

/// POST /api/habits
#[tracing::instrument(skip(state, payload))]
pub async fn create_habit(
    State(state): State<AppState>,
    payload: Result<Json<HabitInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;
    let created_at = state.clock.now().with_timezone(&Utc);
    let habit = state.store.create(input, created_at).await?;

    Ok((StatusCode::CREATED, Json(habit)))
}

/// GET /api/habits/{id} - habit plus its last 30 days of completions
#[tracing::instrument(skip(state, query))]
pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<TodayQuery>, QueryRejection>,
) -> Result<Json<HabitDetail>, AppError> {
    let Query(query) = query?;
    let today = state.now(query.today.as_deref())?.date_naive();
    let habit = state.store.get(&id).await?;

    let range = DateRange::new(
        Some(calendar::add_days(today, 1 - DETAIL_DAYS)),
        Some(today),
    );
    let completions = state
        .store
        .completions(&id, range)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(HabitDetail { habit, completions }))
}

/// PATCH /api/habits/{id}
#[tracing::instrument(skip(state, payload))]
pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<HabitPatch>, JsonRejection>,
) -> Result<Json<Habit>, AppError> {
    let Json(patch) = payload?;
    let habit = state
        .store
        .update(&id, patch)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(habit))
}

/// DELETE /api/habits/{id}
#[tracing::instrument(skip(state))]
pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete(&id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(habit_id = %id, "Habit deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/habits/{id}/toggle/{date}
#[tracing::instrument(skip(state))]
pub async fn toggle_completion(
    State(state): State<AppState>,
    Path((id, date)): Path<(String, String)>,
) -> Result<Json<Completion>, AppError> {
    let date = parse_date(&date)?;
    let completed = state
        .store
        .toggle_completion(&id, date)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(Completion { date, completed }))
}

/// GET /api/habits/{id}/completions?startDate&endDate
#[tracing::instrument(skip(state, query))]
pub async fn get_completions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<CompletionsQuery>, QueryRejection>,
) -> Result<Json<Vec<Completion>>, AppError> {
    let Query(query) = query?;
    let range = DateRange::new(
        parse_optional_date(query.start_date.as_deref())?,
        parse_optional_date(query.end_date.as_deref())?,
    );

    let completions = state
        .store
        .completions(&id, range)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(completions))
}

/// GET /api/habits/{id}/stats
#[tracing::instrument(skip(state, query))]
pub async fn get_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<TodayQuery>, QueryRejection>,
) -> Result<Json<StatsResponse>, AppError> {
    let Query(query) = query?;
    let now = state.now(query.today.as_deref())?;
    let habit = state.store.get(&id).await?;
    let stats = compute_stats(&habit, now);

    Ok(Json(StatsResponse {
        stats,
        streak_text: streak_text(stats.current_streak),
        frequency_text: frequency_text(&habit),
        recent_completions: recent_completions(&habit, now, RECENT_COMPLETIONS),
    }))
}

/// GET /api/habits/{id}/calendar?month=YYYY-MM
#[tracing::instrument(skip(state, query))]
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<CalendarQuery>, QueryRejection>,
) -> Result<Json<Vec<CalendarDay>>, AppError> {
    let Query(query) = query?;
    let today = state.now(query.today.as_deref())?.date_naive();
    let month = match query.month.as_deref() {
        Some(month) => calendar::parse_month(month)
            .ok_or_else(|| AppError::bad_request(format!("Invalid month: {month}")))?,
        None => calendar::start_of_month(today),
    };

    let habit = state.store.get(&id).await?;

    Ok(Json(calendar::month_calendar(&habit.history, month, today)))
}
